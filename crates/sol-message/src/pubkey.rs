//! Text boundary for 32-byte account keys.
//!
//! Account keys and block hashes travel as Base58 strings outside this
//! crate and as raw `[u8; 32]` arrays inside it. The codec itself is
//! delegated to `bs58`; this module only pins the 32-byte length at the
//! boundary.

use crate::error::MessageError;

/// Decode a Base58 string into its 32-byte key form.
///
/// Fails if the string is not valid Base58 or does not decode to exactly
/// 32 bytes.
pub fn pubkey_from_str(s: &str) -> Result<[u8; 32], MessageError> {
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|e| MessageError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let key: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        MessageError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;

    Ok(key)
}

/// Encode a 32-byte key as its canonical Base58 string.
pub fn pubkey_to_str(pubkey: &[u8; 32]) -> String {
    bs58::encode(pubkey).into_string()
}

/// Check that a string is a well-formed Base58 32-byte key.
pub fn validate_pubkey(s: &str) -> Result<(), MessageError> {
    pubkey_from_str(s).map(|_| ())
}
