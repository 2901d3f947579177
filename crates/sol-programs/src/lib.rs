//! Instruction builders for well-known programs.
//!
//! These builders populate opaque [`sol_message::Instruction`] values —
//! program id, account metas with the privileges each operation requires,
//! and the program's binary data layout — which `sol-message` then
//! compiles into a transaction message. System Program and SPL Token
//! layouts are implemented by hand; no `solana-sdk` or `spl-token`
//! dependency.
//!
//! Call sites qualify by module (`system::transfer`, `token::transfer`)
//! since several programs share operation names.

pub mod ata;
pub mod error;
pub mod system;
pub mod token;

pub use ata::{
    derive_associated_token_address, find_program_address, ASSOCIATED_TOKEN_PROGRAM_ID,
};
pub use error::ProgramError;
pub use system::SYSTEM_PROGRAM_ID;
pub use token::{SYSVAR_RENT_ID, TOKEN_PROGRAM_ID};
