//! Canonical transaction messages for the Solana wire format.
//!
//! This crate turns an ordered list of instructions into the single
//! deduplicated, deterministically ordered message the network signs and
//! parses — without pulling in `solana-sdk` (which drags in tokio and 200+
//! transitive dependencies).
//!
//! The pieces, leaf first: a varint codec for every length prefix, the
//! account privilege merge and canonical four-tier ordering, instruction
//! index rewriting, and the exact binary message codec. Base58 text at the
//! boundary is handled by `bs58`.

pub mod compile;
pub mod error;
pub mod message;
pub mod pubkey;
pub mod varint;

// Re-export key public types for ergonomic imports.
pub use compile::{compile_message, MAX_ACCOUNT_KEYS};
pub use error::MessageError;
pub use message::{AccountMeta, CompiledInstruction, Instruction, Message, MessageHeader};
pub use pubkey::{pubkey_from_str, pubkey_to_str, validate_pubkey};
pub use varint::{decode_varint, encode_varint};
