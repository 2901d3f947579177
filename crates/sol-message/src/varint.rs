//! Variable-length unsigned integer codec.
//!
//! Every length prefix in the message wire format (account count,
//! instruction count, per-instruction index count, data length) is an
//! unsigned little-endian base-128 varint: 7 payload bits per byte, with
//! the continuation bit set on every byte except the last.

use crate::error::MessageError;

/// Maximum encoded width of a 64-bit varint: ceil(64 / 7) = 10 bytes.
const MAX_VARINT_LEN: usize = 10;

/// Encode a `u64` as a minimal-width varint.
///
/// - Values 0..=0x7f        -> 1 byte
/// - Values 0x80..=0x3fff   -> 2 bytes
/// - ... up to 10 bytes for `u64::MAX`
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut val = value;
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a varint from the front of `data`.
///
/// Returns `(value, bytes_consumed)`, or an error if the buffer ends
/// before a terminating byte is seen or the encoding spans more than
/// 10 bytes (it would exceed 64 bits).
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize), MessageError> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        if consumed >= MAX_VARINT_LEN {
            return Err(MessageError::DecodeError(
                "varint exceeds 10 bytes".into(),
            ));
        }
        let byte = *data.get(consumed).ok_or_else(|| {
            MessageError::DecodeError("unexpected end of data while decoding varint".into())
        })?;
        consumed += 1;

        // Only the lowest bit of the 10th byte fits in 64 bits.
        if consumed == MAX_VARINT_LEN && byte > 1 {
            return Err(MessageError::DecodeError(
                "varint overflows 64 bits".into(),
            ));
        }

        value |= ((byte & 0x7f) as u64) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            break;
        }
    }

    Ok((value, consumed))
}
