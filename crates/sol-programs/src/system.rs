//! System Program instruction builders.
//!
//! System Program data starts with a little-endian u32 instruction tag,
//! followed by the instruction's fields in little-endian layout.

use sol_message::{AccountMeta, Instruction};

use crate::error::ProgramError;

/// The System Program key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program instruction tags (little-endian u32 on the wire).
const CREATE_ACCOUNT_TAG: u32 = 0;
const TRANSFER_TAG: u32 = 2;

/// Build a `Transfer` instruction moving `lamports` from `from` to `to`.
///
/// Data is 12 bytes: u32 LE tag 2 + u64 LE lamports.
pub fn transfer(
    from: &[u8; 32],
    to: &[u8; 32],
    lamports: u64,
) -> Result<Instruction, ProgramError> {
    if lamports == 0 {
        return Err(ProgramError::InvalidParameter(
            "lamports must be > 0".into(),
        ));
    }

    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_TAG.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Ok(Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *from,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    })
}

/// Build a `CreateAccount` instruction funding `new_account` with
/// `lamports`, allocating `space` bytes, and assigning it to `owner`.
///
/// Data is 52 bytes: u32 LE tag 0 + u64 LE lamports + u64 LE space +
/// 32-byte owner. Both the funder and the new account must sign.
pub fn create_account(
    from: &[u8; 32],
    new_account: &[u8; 32],
    owner: &[u8; 32],
    lamports: u64,
    space: u64,
) -> Instruction {
    let mut data = Vec::with_capacity(52);
    data.extend_from_slice(&CREATE_ACCOUNT_TAG.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner);

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *from,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *new_account,
                is_signer: true,
                is_writable: true,
            },
        ],
        data,
    }
}
