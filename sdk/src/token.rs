//! myspltoken instruction builders: init, mint, transfer, burn.
//!
//! Matches the Anchor program declared at MYSPLTOKEN_PROGRAM_ID.
//! Instruction data is `sha256("global:<name>")[..8]` followed by the
//! Borsh-encoded arguments.
//!
//! Instructions:
//!   init_token(InitTokenParams)
//!   mint_tokens(u64)
//!   transfer_tokens(u64)
//!   burn_tokens(u64)

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program, sysvar,
};

use crate::{constants::*, error::SdkError};

// ── Param Structs (exact Borsh match to program) ────────────────────────────

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitTokenParams {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: u8,
}

impl Default for InitTokenParams {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            uri: DEFAULT_TOKEN_URI.to_string(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

// ── Account Bundles ─────────────────────────────────────────────────────────
// One struct per instruction; every role is a required field. Program and
// sysvar accounts are appended in the program's declared order.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitTokenAccounts {
    pub metadata: Pubkey,
    pub mint: Pubkey,
    pub payer: Pubkey,
}

impl InitTokenAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.metadata, false),
            AccountMeta::new(self.mint, false),
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintTokensAccounts {
    pub mint: Pubkey,
    pub destination: Pubkey,
    pub payer: Pubkey,
}

impl MintTokensAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.mint, false),
            AccountMeta::new(self.destination, false),
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferTokensAccounts {
    pub source: Pubkey,
    pub destination: Pubkey,
    pub payer: Pubkey,
    pub authority: Pubkey,
    pub mint: Pubkey,
}

impl TransferTokensAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.source, false),
            AccountMeta::new(self.destination, false),
            AccountMeta::new(self.payer, true),
            AccountMeta::new(self.authority, true),
            AccountMeta::new_readonly(self.mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurnTokensAccounts {
    pub mint: Pubkey,
    pub source: Pubkey,
    pub owner: Pubkey,
}

impl BurnTokensAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.mint, false),
            AccountMeta::new(self.source, false),
            AccountMeta::new_readonly(self.owner, true),
            AccountMeta::new_readonly(spl_token::id(), false),
        ]
    }
}

// ── Instruction Data ────────────────────────────────────────────────────────

/// Anchor global instruction discriminator.
pub fn discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("global:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

fn instruction_data<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>, SdkError> {
    let mut data = discriminator(name).to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

// ── Instruction Builders ────────────────────────────────────────────────────

/// Create the mint PDA and its metadata record.
pub fn create_init_token_instruction(
    program_id: &Pubkey,
    accounts: &InitTokenAccounts,
    params: &InitTokenParams,
) -> Result<Instruction, SdkError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: instruction_data(IX_INIT_TOKEN, params)?,
    })
}

/// Mint `quantity` base units into `destination`. The program creates the
/// destination associated token account if needed.
pub fn create_mint_tokens_instruction(
    program_id: &Pubkey,
    accounts: &MintTokensAccounts,
    quantity: u64,
) -> Result<Instruction, SdkError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: instruction_data(IX_MINT_TOKENS, &quantity)?,
    })
}

/// Transfer `quantity` base units; `destination` must already exist.
pub fn create_transfer_tokens_instruction(
    program_id: &Pubkey,
    accounts: &TransferTokensAccounts,
    quantity: u64,
) -> Result<Instruction, SdkError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: instruction_data(IX_TRANSFER_TOKENS, &quantity)?,
    })
}

pub fn create_burn_tokens_instruction(
    program_id: &Pubkey,
    accounts: &BurnTokensAccounts,
    quantity: u64,
) -> Result<Instruction, SdkError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: instruction_data(IX_BURN_TOKENS, &quantity)?,
    })
}

/// Create `owner`'s associated token account for `mint`, paid by `funder`.
///
/// Accounts:
///   0. `[signer, writable]` funder
///   1. `[writable]` associated token account
///   2. `[]` owner
///   3. `[]` mint
///   4. `[]` system_program
///   5. `[]` token_program
pub fn create_destination_account_instruction(
    funder: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account(
        funder,
        owner,
        mint,
        &spl_token::id(),
    )
}

/// Move lamports so a fresh wallet can pay rent and fees.
pub fn create_fund_wallet_instruction(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(from, to, lamports)
}
