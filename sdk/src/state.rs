//! Decoding of SPL token and mint account data, and base-unit amounts.

use std::fmt;

use solana_program::{program_pack::Pack, pubkey::Pubkey};
use spl_token::state::{Account as TokenAccount, Mint};

use crate::error::SdkError;

/// The fields of an SPL token account the lifecycle checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountView {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintView {
    pub mint_authority: Option<Pubkey>,
    pub supply: u64,
    pub decimals: u8,
}

pub fn decode_token_account(data: &[u8]) -> Result<TokenAccountView, SdkError> {
    let account = TokenAccount::unpack(data).map_err(SdkError::InvalidTokenAccount)?;
    Ok(TokenAccountView {
        mint: account.mint,
        owner: account.owner,
        amount: account.amount,
    })
}

pub fn decode_mint(data: &[u8]) -> Result<MintView, SdkError> {
    let mint = Mint::unpack(data).map_err(SdkError::InvalidMint)?;
    Ok(MintView {
        mint_authority: mint.mint_authority.into(),
        supply: mint.supply,
        decimals: mint.decimals,
    })
}

/// A token quantity in the smallest on-chain unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const fn new(base_units: u64) -> Self {
        Self(base_units)
    }

    /// Scale a human-scale quantity (e.g. `0.5`) by `10^decimals`.
    pub fn from_ui(ui_amount: f64, decimals: u8) -> Self {
        Self(spl_token::ui_amount_to_amount(ui_amount, decimals))
    }

    pub const fn base_units(self) -> u64 {
        self.0
    }

    pub fn to_ui_string(self, decimals: u8) -> String {
        spl_token::amount_to_ui_amount_string_trimmed(self.0, decimals)
    }
}

impl From<u64> for TokenAmount {
    fn from(base_units: u64) -> Self {
        Self(base_units)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
