//! Program-derived and associated token account addresses.
//!
//! Mint:     seeds ["mint"] under the myspltoken program
//! Metadata: seeds ["metadata", metadata_program, mint] under the metadata program

use solana_program::pubkey::Pubkey;

use crate::{constants::*, error::SdkError};

/// Derive a program address and its bump from `seeds` under `program_id`.
///
/// Pure and deterministic: identical inputs always give the same pair.
pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8), SdkError> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or(SdkError::DerivationFailed {
        program: *program_id,
    })
}

pub fn find_mint(program_id: &Pubkey) -> Result<(Pubkey, u8), SdkError> {
    derive(&[MINT_SEED], program_id)
}

pub fn find_metadata(mint: &Pubkey) -> Result<(Pubkey, u8), SdkError> {
    derive(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// The owner's associated token account for `mint` under the SPL token program.
#[allow(deprecated)]
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}
