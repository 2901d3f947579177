//! The canonical transaction message and its binary wire codec.
//!
//! The message is the byte sequence a signature is later computed over, so
//! the layout is bit-exact:
//!
//! ```text
//! message:
//!   num_required_signatures   u8
//!   num_readonly_signed       u8
//!   num_readonly_unsigned     u8
//!   num_account_keys          varint
//!   account_keys              32 bytes each
//!   recent_blockhash          32 bytes
//!   num_instructions          varint
//!   instructions[]            (see below)
//!
//! instruction:
//!   program_id_index          u8
//!   num_account_indices       varint
//!   account_indices           u8 each
//!   data_len                  u8
//!   data                      u8 * data_len
//! ```
//!
//! Decoding is deliberately more tolerant than encoding: the three header
//! bytes and the single-byte index fields are parsed as varints bounded to
//! one byte's range, matching the network parser's behavior. A decoder
//! never reads past the buffer; any truncation or over-declared count is a
//! `DecodeError` naming the offending field.

use crate::error::MessageError;
use crate::varint::{decode_varint, encode_varint};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction, with the privileges that
/// instruction requires for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

/// An instruction before compilation: a program to invoke, the accounts it
/// touches (order significant), and opaque data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An instruction after compilation, with account references replaced by
/// indices into the message's `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// The three-byte privilege header. The first `num_required_signatures`
/// entries of `account_keys` are the signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
}

/// A compiled transaction message. Built once by
/// [`compile_message`](crate::compile::compile_message) or by
/// [`Message::deserialize`] and never mutated.
///
/// `account_keys` holds every key the transaction references, deduplicated
/// and in canonical order: writable signers, read-only signers, writable
/// non-signers, read-only non-signers. `recent_blockhash` is kept in its
/// Base58 text form and only decoded at the wire boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<[u8; 32]>,
    pub recent_blockhash: String,
    pub instructions: Vec<CompiledInstruction>,
}

// ---------------------------------------------------------------------------
// Wire codec
// ---------------------------------------------------------------------------

impl Message {
    /// Serialize the message into its exact wire byte layout.
    ///
    /// Fails with `EncodeError`, before any bytes are returned, if the
    /// block hash text does not decode to exactly 32 bytes or an
    /// instruction carries more than 255 bytes of data.
    pub fn serialize(&self) -> Result<Vec<u8>, MessageError> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        buf.extend_from_slice(&encode_varint(self.account_keys.len() as u64));
        for key in &self.account_keys {
            buf.extend_from_slice(key);
        }

        let block_hash = bs58::decode(&self.recent_blockhash)
            .into_vec()
            .map_err(|e| MessageError::EncodeError(format!("invalid block hash: {e}")))?;
        if block_hash.len() != 32 {
            return Err(MessageError::EncodeError(format!(
                "invalid block hash: expected 32 bytes, got {}",
                block_hash.len()
            )));
        }
        buf.extend_from_slice(&block_hash);

        buf.extend_from_slice(&encode_varint(self.instructions.len() as u64));
        for (i, ix) in self.instructions.iter().enumerate() {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&encode_varint(ix.account_indices.len() as u64));
            buf.extend_from_slice(&ix.account_indices);

            if ix.data.len() > u8::MAX as usize {
                return Err(MessageError::EncodeError(format!(
                    "instruction #{}: data is {} bytes, wire format caps it at 255",
                    i + 1,
                    ix.data.len()
                )));
            }
            buf.push(ix.data.len() as u8);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }

    /// Parse a message from untrusted wire bytes.
    ///
    /// Fails closed: any truncation, a count whose implied consumption
    /// exceeds the remaining bytes, or a single-byte field decoding above
    /// 255 is a `DecodeError` carrying the offending field's position.
    /// Bytes past the end of a complete message are ignored.
    pub fn deserialize(data: &[u8]) -> Result<Message, MessageError> {
        let mut pos = 0usize;

        let mut header = [0u8; 3];
        for (i, field) in header.iter_mut().enumerate() {
            *field = read_byte_sized(data, &mut pos, &format!("message header #{}", i + 1))?;
        }

        let account_count = read_varint_at(data, &mut pos, "account count")?;
        let needed = account_count.checked_mul(32).ok_or_else(|| {
            MessageError::DecodeError(format!("account count {account_count} overflows"))
        })?;
        let remaining = (data.len() - pos) as u64;
        if needed > remaining {
            return Err(MessageError::DecodeError(format!(
                "account keys: {account_count} keys need {needed} bytes, {remaining} remain"
            )));
        }
        let mut account_keys = Vec::with_capacity(account_count as usize);
        for _ in 0..account_count {
            let mut key = [0u8; 32];
            key.copy_from_slice(&data[pos..pos + 32]);
            pos += 32;
            account_keys.push(key);
        }

        if data.len() - pos < 32 {
            return Err(MessageError::DecodeError(format!(
                "block hash: 32 bytes needed, {} remain",
                data.len() - pos
            )));
        }
        let recent_blockhash = bs58::encode(&data[pos..pos + 32]).into_string();
        pos += 32;

        let instruction_count = read_varint_at(data, &mut pos, "instruction count")?;
        let mut instructions = Vec::new();
        for i in 0..instruction_count {
            let n = i + 1;

            let program_id_index =
                read_byte_sized(data, &mut pos, &format!("instruction #{n} program index"))?;

            let index_count =
                read_varint_at(data, &mut pos, &format!("instruction #{n} account count"))?;
            let mut account_indices = Vec::new();
            for j in 0..index_count {
                let idx = read_byte_sized(
                    data,
                    &mut pos,
                    &format!("instruction #{n} account #{}", j + 1),
                )?;
                account_indices.push(idx);
            }

            let data_len =
                read_varint_at(data, &mut pos, &format!("instruction #{n} data length"))?;
            if data_len > (data.len() - pos) as u64 {
                return Err(MessageError::DecodeError(format!(
                    "instruction #{n} data: {data_len} bytes declared, {} remain",
                    data.len() - pos
                )));
            }
            let ix_data = data[pos..pos + data_len as usize].to_vec();
            pos += data_len as usize;

            instructions.push(CompiledInstruction {
                program_id_index,
                account_indices,
                data: ix_data,
            });
        }

        Ok(Message {
            header: MessageHeader {
                num_required_signatures: header[0],
                num_readonly_signed: header[1],
                num_readonly_unsigned: header[2],
            },
            account_keys,
            recent_blockhash,
            instructions,
        })
    }
}

/// Decode a varint at `pos`, advancing the cursor, tagging failures with
/// the field being parsed.
fn read_varint_at(data: &[u8], pos: &mut usize, field: &str) -> Result<u64, MessageError> {
    let (value, consumed) = decode_varint(&data[*pos..]).map_err(|err| match err {
        MessageError::DecodeError(msg) => MessageError::DecodeError(format!("{field}: {msg}")),
        other => other,
    })?;
    *pos += consumed;
    Ok(value)
}

/// Decode a varint bounded to one byte's range. Single-byte wire fields
/// (header counts, account and program indices) are parsed this way.
fn read_byte_sized(data: &[u8], pos: &mut usize, field: &str) -> Result<u8, MessageError> {
    let value = read_varint_at(data, pos, field)?;
    if value > u8::MAX as u64 {
        return Err(MessageError::DecodeError(format!(
            "{field}: value {value} exceeds one byte"
        )));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubkey::pubkey_to_str;

    fn sample_message() -> Message {
        Message {
            header: MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed: 0,
                num_readonly_unsigned: 1,
            },
            account_keys: vec![[0x01; 32], [0x02; 32], [0x03; 32]],
            recent_blockhash: pubkey_to_str(&[0x11; 32]),
            instructions: vec![CompiledInstruction {
                program_id_index: 2,
                account_indices: vec![0, 1],
                data: vec![9],
            }],
        }
    }

    // -- serialization layout ---------------------------------------------

    #[test]
    fn serialize_starts_with_header_bytes() {
        let bytes = sample_message().serialize().unwrap();
        assert_eq!(&bytes[..3], &[1, 0, 1]);
    }

    #[test]
    fn serialize_account_keys_follow_count() {
        let bytes = sample_message().serialize().unwrap();
        // One-byte varint count of 3, then the three keys.
        assert_eq!(bytes[3], 3);
        assert_eq!(&bytes[4..36], &[0x01; 32]);
        assert_eq!(&bytes[36..68], &[0x02; 32]);
        assert_eq!(&bytes[68..100], &[0x03; 32]);
    }

    #[test]
    fn serialize_blockhash_is_raw_32_bytes() {
        let bytes = sample_message().serialize().unwrap();
        assert_eq!(&bytes[100..132], &[0x11; 32]);
    }

    #[test]
    fn serialize_instruction_section() {
        let bytes = sample_message().serialize().unwrap();
        // ix count, program index, index count, indices, data len, data.
        assert_eq!(&bytes[132..], &[1, 2, 2, 0, 1, 1, 9]);
    }

    #[test]
    fn serialize_full_fixture() {
        let bytes = sample_message().serialize().unwrap();
        let expected = [
            "010001",                     // header
            "03",                         // account count
            &"01".repeat(32)[..],         // key A
            &"02".repeat(32)[..],         // key B
            &"03".repeat(32)[..],         // key P
            &"11".repeat(32)[..],         // block hash
            "01020200010109",             // one instruction
        ]
        .concat();
        assert_eq!(hex::encode(&bytes), expected);
    }

    #[test]
    fn serialize_rejects_bad_blockhash_text() {
        let mut msg = sample_message();
        msg.recent_blockhash = "0OIl".into(); // not base58
        assert!(matches!(
            msg.serialize(),
            Err(MessageError::EncodeError(_))
        ));
    }

    #[test]
    fn serialize_rejects_short_blockhash() {
        let mut msg = sample_message();
        msg.recent_blockhash = "abc".into(); // valid base58, wrong length
        let err = msg.serialize().unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes"));
    }

    #[test]
    fn serialize_rejects_oversized_instruction_data() {
        let mut msg = sample_message();
        msg.instructions[0].data = vec![0u8; 256];
        let err = msg.serialize().unwrap_err();
        assert!(err.to_string().contains("caps it at 255"));
    }

    #[test]
    fn serialize_allows_255_byte_data() {
        let mut msg = sample_message();
        msg.instructions[0].data = vec![0xee; 255];
        assert!(msg.serialize().is_ok());
    }

    // -- deserialization ----------------------------------------------------

    #[test]
    fn roundtrip_preserves_message() {
        let msg = sample_message();
        let bytes = msg.serialize().unwrap();
        let parsed = Message::deserialize(&bytes).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn roundtrip_empty_message() {
        let msg = Message {
            header: MessageHeader {
                num_required_signatures: 0,
                num_readonly_signed: 0,
                num_readonly_unsigned: 0,
            },
            account_keys: vec![],
            recent_blockhash: pubkey_to_str(&[0xaa; 32]),
            instructions: vec![],
        };
        let bytes = msg.serialize().unwrap();
        assert_eq!(bytes.len(), 3 + 1 + 32 + 1);
        assert_eq!(Message::deserialize(&bytes).unwrap(), msg);
    }

    #[test]
    fn deserialize_reencodes_blockhash_as_text() {
        let bytes = sample_message().serialize().unwrap();
        let parsed = Message::deserialize(&bytes).unwrap();
        assert_eq!(parsed.recent_blockhash, pubkey_to_str(&[0x11; 32]));
    }

    #[test]
    fn deserialize_accepts_varint_header_fields() {
        // The encoder emits fixed single bytes, but the parser accepts a
        // two-byte varint for a header field as long as it fits in a byte.
        let mut bytes = sample_message().serialize().unwrap();
        // Rewrite header field #1 (value 1) as the wide varint [0x81, 0x00].
        bytes.splice(0..1, [0x81, 0x00]);
        let parsed = Message::deserialize(&bytes).unwrap();
        assert_eq!(parsed.header.num_required_signatures, 1);
    }

    #[test]
    fn deserialize_rejects_header_field_above_255() {
        // 300 as a varint in the first header slot.
        let err = Message::deserialize(&[0xac, 0x02, 0, 0]).unwrap_err();
        assert!(err.to_string().contains("message header #1"));
    }

    #[test]
    fn deserialize_rejects_account_count_beyond_buffer() {
        // Header, then claim 100 accounts with no bytes behind the claim.
        let err = Message::deserialize(&[1, 0, 1, 100]).unwrap_err();
        assert!(err.to_string().contains("account keys"));
    }

    #[test]
    fn deserialize_rejects_missing_blockhash() {
        let bytes = [1u8, 0, 1, 0]; // zero accounts, nothing after
        let err = Message::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("block hash"));
    }

    #[test]
    fn deserialize_rejects_overdeclared_instruction_data() {
        let mut bytes = sample_message().serialize().unwrap();
        // The last two bytes are data_len=1 and the single data byte.
        let len = bytes.len();
        bytes[len - 2] = 200;
        let err = Message::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("instruction #1 data"));
    }

    #[test]
    fn deserialize_rejects_wide_account_index() {
        let mut msg = sample_message();
        msg.instructions[0].account_indices = vec![0];
        let mut bytes = msg.serialize().unwrap();
        // account_indices starts 4 bytes from the end: [count, idx, len, data].
        let at = bytes.len() - 3;
        bytes.splice(at..at + 1, [0xac, 0x02]); // index 300
        let err = Message::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("instruction #1 account #1"));
    }

    #[test]
    fn deserialize_ignores_trailing_bytes() {
        let msg = sample_message();
        let mut bytes = msg.serialize().unwrap();
        bytes.extend_from_slice(&[0xde, 0xad]);
        assert_eq!(Message::deserialize(&bytes).unwrap(), msg);
    }

    #[test]
    fn every_truncation_fails_cleanly() {
        let bytes = sample_message().serialize().unwrap();
        for cut in 0..bytes.len() {
            let result = Message::deserialize(&bytes[..cut]);
            assert!(
                matches!(result, Err(MessageError::DecodeError(_))),
                "prefix of length {cut} must fail to decode"
            );
        }
    }

    #[test]
    fn decode_errors_carry_position_context() {
        let bytes = sample_message().serialize().unwrap();
        // Cut inside the instruction section.
        let err = Message::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(err.to_string().contains("instruction #1"));
    }
}
