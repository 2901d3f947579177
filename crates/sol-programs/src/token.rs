//! SPL Token Program instruction builders.
//!
//! Token data starts with a single tag byte, followed by the fields in
//! little-endian layout. An optional pubkey is a 0/1 option byte always
//! followed by 32 bytes (zeroed when absent).
//!
//! The authority account is a direct signer only when no multisig signer
//! list is supplied; otherwise the listed signers sign and the authority
//! is the multisig account itself.

use sol_message::{AccountMeta, Instruction};

use crate::error::ProgramError;

/// SPL Token Program key.
/// Base58: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb,
    0x79, 0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85,
    0x7e, 0xff, 0x00, 0xa9,
];

/// Rent sysvar key, a read-only input to the initialize instructions.
/// Base58: `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: [u8; 32] = [
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a,
    0xf1, 0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a,
    0x00, 0x00, 0x00, 0x00,
];

/// Token instruction tags (single byte on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenInstruction {
    InitializeMint = 0,
    InitializeAccount,
    InitializeMultisig,
    Transfer,
    Approve,
    Revoke,
    SetAuthority,
    MintTo,
    Burn,
    CloseAccount,
    FreezeAccount,
    ThawAccount,
    TransferChecked,
    ApproveChecked,
    MintToChecked,
    BurnChecked,
    InitializeAccount2,
    SyncNative,
    InitializeAccount3,
    InitializeMultisig2,
    InitializeMint2,
}

/// Build an `InitializeMint` instruction for a freshly created mint
/// account. Pass `None` to leave the mint unfreezable.
pub fn initialize_mint(
    decimals: u8,
    mint: &[u8; 32],
    mint_authority: &[u8; 32],
    freeze_authority: Option<&[u8; 32]>,
) -> Instruction {
    // tag + decimals + authority + option byte + freeze authority = 67.
    let mut data = Vec::with_capacity(67);
    data.push(TokenInstruction::InitializeMint as u8);
    data.push(decimals);
    data.extend_from_slice(mint_authority);
    match freeze_authority {
        Some(auth) => {
            data.push(1);
            data.extend_from_slice(auth);
        }
        None => {
            data.push(0);
            data.extend_from_slice(&[0u8; 32]);
        }
    }

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *mint,
                is_signer: false,
                is_writable: true,
            },
            AccountMeta {
                pubkey: SYSVAR_RENT_ID,
                is_signer: false,
                is_writable: false,
            },
        ],
        data,
    }
}

/// Build an `InitializeAccount` instruction turning `account` into a token
/// account for `mint` owned by `owner`.
pub fn initialize_account(
    account: &[u8; 32],
    mint: &[u8; 32],
    owner: &[u8; 32],
) -> Instruction {
    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *account,
                is_signer: false,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *mint,
                is_signer: false,
                is_writable: false,
            },
            AccountMeta {
                pubkey: *owner,
                is_signer: false,
                is_writable: false,
            },
            AccountMeta {
                pubkey: SYSVAR_RENT_ID,
                is_signer: false,
                is_writable: false,
            },
        ],
        data: vec![TokenInstruction::InitializeAccount as u8],
    }
}

/// Build an `InitializeMultisig` instruction. Between 1 and 11 signer
/// keys; `min_required` of them must sign future operations.
pub fn initialize_multisig(
    account: &[u8; 32],
    signers: &[[u8; 32]],
    min_required: u8,
) -> Result<Instruction, ProgramError> {
    if signers.is_empty() || signers.len() > 11 {
        return Err(ProgramError::InvalidParameter(format!(
            "multisig needs between 1 and 11 signers, got {}",
            signers.len()
        )));
    }
    if min_required as usize > signers.len() {
        return Err(ProgramError::InvalidParameter(format!(
            "required signer count {min_required} exceeds the {} provided",
            signers.len()
        )));
    }

    let mut accounts = Vec::with_capacity(2 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *account,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: SYSVAR_RENT_ID,
        is_signer: false,
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Ok(Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: vec![TokenInstruction::InitializeMultisig as u8, min_required],
    })
}

/// Build a `Transfer` of `amount` base units from one token account to
/// another. `signers` is empty for a single-owner authority.
pub fn transfer(
    from: &[u8; 32],
    to: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
    amount: u64,
) -> Result<Instruction, ProgramError> {
    if amount == 0 {
        return Err(ProgramError::InvalidParameter(
            "transfer amount must be > 0".into(),
        ));
    }

    let mut accounts = Vec::with_capacity(3 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *from,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *to,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *authority,
        is_signer: signers.is_empty(),
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Ok(Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(TokenInstruction::Transfer, amount),
    })
}

/// Build a `MintTo` instruction minting `amount` base units into `to`.
pub fn mint_to(
    mint: &[u8; 32],
    to: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
    amount: u64,
) -> Instruction {
    let mut accounts = Vec::with_capacity(3 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *mint,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *to,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *authority,
        is_signer: signers.is_empty(),
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(TokenInstruction::MintTo, amount),
    }
}

/// Build a `Burn` instruction destroying `amount` base units held in
/// `account`.
pub fn burn(
    account: &[u8; 32],
    mint: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
    amount: u64,
) -> Instruction {
    let mut accounts = Vec::with_capacity(3 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *account,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *mint,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *authority,
        is_signer: signers.is_empty(),
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(TokenInstruction::Burn, amount),
    }
}

/// Build an `Approve` instruction letting `delegate` move up to `amount`
/// base units out of `from`.
pub fn approve(
    from: &[u8; 32],
    delegate: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
    amount: u64,
) -> Instruction {
    let mut accounts = Vec::with_capacity(3 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *from,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *delegate,
        is_signer: false,
        is_writable: false,
    });
    accounts.push(AccountMeta {
        pubkey: *authority,
        is_signer: signers.is_empty(),
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(TokenInstruction::Approve, amount),
    }
}

/// Build a `Revoke` instruction clearing any delegate on `from`.
pub fn revoke(
    from: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
) -> Instruction {
    let mut accounts = Vec::with_capacity(2 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *from,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *authority,
        is_signer: signers.is_empty(),
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: vec![TokenInstruction::Revoke as u8],
    }
}

/// Build a `CloseAccount` instruction reclaiming the rent lamports of
/// `account` into `to`. The account must hold a zero token balance.
pub fn close_account(
    account: &[u8; 32],
    to: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
) -> Instruction {
    let mut accounts = Vec::with_capacity(3 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *account,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *to,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *authority,
        is_signer: signers.is_empty(),
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: vec![TokenInstruction::CloseAccount as u8],
    }
}

/// Build a `FreezeAccount` instruction. The authority is the mint's
/// freeze authority, not the account owner.
pub fn freeze_account(
    account: &[u8; 32],
    mint: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
) -> Instruction {
    frozen_state_instruction(TokenInstruction::FreezeAccount, account, mint, authority, signers)
}

/// Build a `ThawAccount` instruction undoing a freeze.
pub fn thaw_account(
    account: &[u8; 32],
    mint: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
) -> Instruction {
    frozen_state_instruction(TokenInstruction::ThawAccount, account, mint, authority, signers)
}

/// `FreezeAccount` and `ThawAccount` share the same account layout and
/// tag-only data.
fn frozen_state_instruction(
    tag: TokenInstruction,
    account: &[u8; 32],
    mint: &[u8; 32],
    authority: &[u8; 32],
    signers: &[[u8; 32]],
) -> Instruction {
    let mut accounts = Vec::with_capacity(3 + signers.len());
    accounts.push(AccountMeta {
        pubkey: *account,
        is_signer: false,
        is_writable: true,
    });
    accounts.push(AccountMeta {
        pubkey: *mint,
        is_signer: false,
        is_writable: false,
    });
    accounts.push(AccountMeta {
        pubkey: *authority,
        is_signer: signers.is_empty(),
        is_writable: false,
    });
    push_signers(&mut accounts, signers);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts,
        data: vec![tag as u8],
    }
}

/// Tag byte + u64 LE amount: the 9-byte data shape shared by `Transfer`,
/// `Approve`, `MintTo`, and `Burn`.
fn amount_data(tag: TokenInstruction, amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(9);
    data.push(tag as u8);
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

fn push_signers(accounts: &mut Vec<AccountMeta>, signers: &[[u8; 32]]) {
    for signer in signers {
        accounts.push(AccountMeta {
            pubkey: *signer,
            is_signer: true,
            is_writable: false,
        });
    }
}
