//! Instruction compilation: privilege merging, canonical account ordering,
//! and index rewriting.
//!
//! Compilation must be deterministic down to the byte, because the
//! serialized message is what later gets signed. The merge step therefore
//! keeps accounts in a plain `Vec` in first-occurrence order — never an
//! unordered hash map, whose iteration order would reshuffle the account
//! list between runs.

use crate::error::MessageError;
use crate::message::{CompiledInstruction, Instruction, Message, MessageHeader};

/// Hard cap on distinct accounts in one message: wire-format account and
/// program indices are single bytes.
pub const MAX_ACCOUNT_KEYS: usize = 256;

/// One account's merged privilege across all instructions.
struct AccountEntry {
    pubkey: [u8; 32],
    is_signer: bool,
    is_writable: bool,
}

/// Compile a message from raw instructions, an optional fee payer, and a
/// recent block hash in Base58 text form.
///
/// The fee payer, when given, lands at `account_keys[0]` as writable and
/// signer regardless of what any instruction requested for it. The block
/// hash text is stored as-is and validated when the message is serialized.
///
/// Fails if the deduplicated account list would exceed
/// [`MAX_ACCOUNT_KEYS`].
pub fn compile_message(
    instructions: &[Instruction],
    fee_payer: Option<&[u8; 32]>,
    recent_blockhash: &str,
) -> Result<Message, MessageError> {
    let entries = merge_accounts(instructions);
    let (account_keys, header) = order_accounts(&entries, fee_payer)?;

    if account_keys.len() > MAX_ACCOUNT_KEYS {
        return Err(MessageError::MessageBuildError(format!(
            "{} distinct accounts, wire format caps a message at {MAX_ACCOUNT_KEYS}",
            account_keys.len()
        )));
    }

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = position_of(&account_keys, &ix.program_id, "program id")?;

        let mut account_indices = Vec::with_capacity(ix.accounts.len());
        for meta in &ix.accounts {
            account_indices.push(position_of(&account_keys, &meta.pubkey, "account")?);
        }

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(Message {
        header,
        account_keys,
        recent_blockhash: recent_blockhash.to_string(),
        instructions: compiled,
    })
}

/// Collapse per-instruction account requirements into one deduplicated
/// list, ordered by first occurrence.
///
/// A program id is inserted as read-only non-signer the first time it is
/// seen and never elevated by later program-id appearances. Account flags
/// merge by logical OR: privilege is monotonic, never downgraded.
fn merge_accounts(instructions: &[Instruction]) -> Vec<AccountEntry> {
    let mut entries: Vec<AccountEntry> = Vec::new();

    for ix in instructions {
        if !entries.iter().any(|e| e.pubkey == ix.program_id) {
            entries.push(AccountEntry {
                pubkey: ix.program_id,
                is_signer: false,
                is_writable: false,
            });
        }

        for meta in &ix.accounts {
            if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == meta.pubkey) {
                entry.is_signer |= meta.is_signer;
                entry.is_writable |= meta.is_writable;
            } else {
                entries.push(AccountEntry {
                    pubkey: meta.pubkey,
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                });
            }
        }
    }

    entries
}

/// Arrange merged accounts into the four privilege tiers and derive the
/// header counts.
///
/// Tier order is fixed: writable signers, read-only signers, writable
/// non-signers, read-only non-signers; within a tier, first-occurrence
/// order is preserved. A fee payer is excluded from classification and
/// prepended to the writable-signer tier, its merged flags ignored.
///
/// Fails if any header count would exceed its single wire byte; the
/// counts are part of the signed bytes and must never wrap.
fn order_accounts(
    entries: &[AccountEntry],
    fee_payer: Option<&[u8; 32]>,
) -> Result<(Vec<[u8; 32]>, MessageHeader), MessageError> {
    let mut writable_signed: Vec<[u8; 32]> = Vec::new();
    let mut readonly_signed: Vec<[u8; 32]> = Vec::new();
    let mut writable_unsigned: Vec<[u8; 32]> = Vec::new();
    let mut readonly_unsigned: Vec<[u8; 32]> = Vec::new();

    for entry in entries {
        if fee_payer == Some(&entry.pubkey) {
            continue;
        }
        match (entry.is_signer, entry.is_writable) {
            (true, true) => writable_signed.push(entry.pubkey),
            (true, false) => readonly_signed.push(entry.pubkey),
            (false, true) => writable_unsigned.push(entry.pubkey),
            (false, false) => readonly_unsigned.push(entry.pubkey),
        }
    }

    if let Some(payer) = fee_payer {
        writable_signed.insert(0, *payer);
    }

    let header = MessageHeader {
        num_required_signatures: header_count(
            writable_signed.len() + readonly_signed.len(),
            "signers",
        )?,
        num_readonly_signed: header_count(readonly_signed.len(), "read-only signers")?,
        num_readonly_unsigned: header_count(readonly_unsigned.len(), "read-only non-signers")?,
    };

    let mut account_keys =
        Vec::with_capacity(writable_signed.len() + readonly_signed.len()
            + writable_unsigned.len() + readonly_unsigned.len());
    account_keys.extend(writable_signed);
    account_keys.extend(readonly_signed);
    account_keys.extend(writable_unsigned);
    account_keys.extend(readonly_unsigned);

    Ok((account_keys, header))
}

/// A header count must fit its single wire byte.
fn header_count(count: usize, what: &str) -> Result<u8, MessageError> {
    u8::try_from(count).map_err(|_| {
        MessageError::MessageBuildError(format!("{count} {what}, header field caps at 255"))
    })
}

/// Index of `pubkey` in the canonical account list. Present by
/// construction for every compiled instruction; surfaced as an error
/// rather than a panic all the same.
fn position_of(
    account_keys: &[[u8; 32]],
    pubkey: &[u8; 32],
    what: &str,
) -> Result<u8, MessageError> {
    account_keys
        .iter()
        .position(|k| k == pubkey)
        .map(|i| i as u8)
        .ok_or_else(|| {
            MessageError::MessageBuildError(format!("{what} missing from account keys"))
        })
}
