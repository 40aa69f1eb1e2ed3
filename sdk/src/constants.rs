//! Program IDs, PDA seeds and default token parameters.

use solana_program::pubkey::Pubkey;

// ── Program IDs ─────────────────────────────────────────────────────────────

/// myspltoken program: Anchor program owning the mint PDA.
pub const MYSPLTOKEN_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("53Tt3YDUVYtWBQEyWZdHebdDFebfhjt9fMAwG6D3uAEz");

/// Metaplex token-metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bgBUV4t6");

// ── PDA Seeds ───────────────────────────────────────────────────────────────

pub const MINT_SEED: &[u8] = b"mint";
pub const METADATA_SEED: &[u8] = b"metadata";

// ── Anchor Instruction Names ────────────────────────────────────────────────

pub const IX_INIT_TOKEN: &str = "init_token";
pub const IX_MINT_TOKENS: &str = "mint_tokens";
pub const IX_TRANSFER_TOKENS: &str = "transfer_tokens";
pub const IX_BURN_TOKENS: &str = "burn_tokens";

// ── Default Token Parameters ────────────────────────────────────────────────

pub const DEFAULT_TOKEN_NAME: &str = "My The first token";
pub const DEFAULT_TOKEN_SYMBOL: &str = "TFT";
pub const DEFAULT_TOKEN_URI: &str = "https://5vfxc4tr6xoy23qefqbj4qx2adzkzapneebanhcalf7myvn5gzja.arweave.net/7UtxcnH13Y1uBCwCnkL6APKsge0hAgacQFl-zFW9NlI";

/// Same as SOL: 9 decimals.
pub const DEFAULT_DECIMALS: u8 = 9;

/// Lamports handed to a fresh receiver so it can pay for its token account (2 SOL).
pub const DEFAULT_RECEIVER_FUNDING_LAMPORTS: u64 = 2_000_000_000;
