//! Associated token account (PDA) derivation.
//!
//! An associated token account is a Program Derived Address with seeds
//! `[wallet, token_program_id, mint]` under the ATA program. PDA
//! derivation hashes the seeds with a bump and requires the result to be
//! off the Ed25519 curve, so no private key can ever exist for it.

use sha2::{Digest, Sha256};

use crate::error::ProgramError;
use crate::token::TOKEN_PROGRAM_ID;

/// Associated Token Account Program key.
/// Base58: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e,
    0x0d, 0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8,
    0xdb, 0xe9, 0xf8, 0x59,
];

/// Domain separator appended to every PDA hash.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive the associated token account address for a wallet + mint pair.
pub fn derive_associated_token_address(
    wallet: &[u8; 32],
    mint: &[u8; 32],
) -> Result<[u8; 32], ProgramError> {
    find_program_address(
        &[wallet.as_ref(), &TOKEN_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Find a valid PDA for the given seeds and program, trying bump seeds
/// from 255 down to 0 and returning the first off-curve result.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), ProgramError> {
    for bump in (0u8..=255).rev() {
        if let Some(address) = try_create_program_address(seeds, &[bump], program_id) {
            return Ok((address, bump));
        }
    }

    Err(ProgramError::DerivationError(
        "could not find valid PDA bump seed".into(),
    ))
}

/// `SHA-256(seeds || bump || program_id || "ProgramDerivedAddress")`, or
/// `None` if the hash lands on the Ed25519 curve (try the next bump).
fn try_create_program_address(
    seeds: &[&[u8]],
    bump_seed: &[u8],
    program_id: &[u8; 32],
) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();

    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(bump_seed);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }

    Some(hash)
}

/// Whether 32 bytes decompress to a valid Ed25519 point.
fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_message::{pubkey_from_str, pubkey_to_str};

    #[test]
    fn associated_token_program_id_text_form() {
        assert_eq!(
            pubkey_to_str(&ASSOCIATED_TOKEN_PROGRAM_ID),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
    }

    #[test]
    fn ata_is_off_curve() {
        let ata = derive_associated_token_address(&[0xaa; 32], &[0xbb; 32]).unwrap();
        assert!(!is_on_curve(&ata));
    }

    #[test]
    fn ata_derivation_is_deterministic() {
        let a = derive_associated_token_address(&[0x11; 32], &[0x22; 32]).unwrap();
        let b = derive_associated_token_address(&[0x11; 32], &[0x22; 32]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_wallets_get_distinct_atas() {
        let mint = [0xff; 32];
        let a = derive_associated_token_address(&[0x01; 32], &mint).unwrap();
        let b = derive_associated_token_address(&[0x02; 32], &mint).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_mints_get_distinct_atas() {
        let wallet = [0xaa; 32];
        let a = derive_associated_token_address(&wallet, &[0x01; 32]).unwrap();
        let b = derive_associated_token_address(&wallet, &[0x02; 32]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn find_program_address_returns_bump() {
        let (_, bump) = find_program_address(&[b"seed"], &ASSOCIATED_TOKEN_PROGRAM_ID).unwrap();
        // The bump search starts at 255 and almost always succeeds within a
        // handful of tries; any returned bump must re-derive the same key.
        let (again, bump_again) =
            find_program_address(&[b"seed"], &ASSOCIATED_TOKEN_PROGRAM_ID).unwrap();
        assert_eq!(bump, bump_again);
        assert!(!is_on_curve(&again));
    }

    #[test]
    fn is_on_curve_accepts_basepoint() {
        // The Ed25519 basepoint in compressed form.
        let basepoint: [u8; 32] = [
            0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
        ];
        assert!(is_on_curve(&basepoint));
    }

    #[test]
    fn ata_for_known_mint_is_valid_base58() {
        // USDC mint on mainnet.
        let usdc = pubkey_from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        let ata = derive_associated_token_address(&[0x42; 32], &usdc).unwrap();
        let text = pubkey_to_str(&ata);
        assert_eq!(pubkey_from_str(&text).unwrap(), ata);
    }
}
