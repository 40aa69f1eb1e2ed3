//! Environment-driven configuration, resolved once into an explicit value
//! that the binary turns into a [`ClusterContext`](crate::ClusterContext).

use std::path::PathBuf;
use std::str::FromStr;

use myspltoken_sdk::{constants::*, token::InitTokenParams};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};

use crate::explorer::Cluster;

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";
pub const DEFAULT_WALLET_PATH: &str = "~/.config/solana/id.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Failed to read keypair from {path}: {reason}")]
    Keypair { path: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub rpc_url: String,
    pub wallet_path: PathBuf,
    pub program_id: Pubkey,
    pub commitment: CommitmentConfig,
    pub token: InitTokenParams,
    pub receiver_funding_lamports: u64,
    pub report_file: Option<PathBuf>,
}

impl LifecycleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = lookup("ANCHOR_PROVIDER_URL")
            .or_else(|| lookup("RPC_URL"))
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let wallet = lookup("ANCHOR_WALLET").unwrap_or_else(|| DEFAULT_WALLET_PATH.to_string());
        let wallet_path = expand_home(&wallet, lookup("HOME"));

        let program_id = match lookup("MYSPLTOKEN_PROGRAM_ID") {
            Some(value) => Pubkey::from_str(&value).map_err(|e| ConfigError::Invalid {
                key: "MYSPLTOKEN_PROGRAM_ID",
                reason: e.to_string(),
                value,
            })?,
            None => MYSPLTOKEN_PROGRAM_ID,
        };

        let commitment = match lookup("COMMITMENT") {
            Some(value) => parse_commitment(&value)?,
            None => CommitmentConfig::confirmed(),
        };

        let decimals = parse_or("TOKEN_DECIMALS", lookup("TOKEN_DECIMALS"), DEFAULT_DECIMALS)?;
        let token = InitTokenParams {
            name: lookup("TOKEN_NAME").unwrap_or_else(|| DEFAULT_TOKEN_NAME.to_string()),
            symbol: lookup("TOKEN_SYMBOL").unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string()),
            uri: lookup("TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            decimals,
        };

        let receiver_funding_lamports = parse_or(
            "RECEIVER_FUNDING_LAMPORTS",
            lookup("RECEIVER_FUNDING_LAMPORTS"),
            DEFAULT_RECEIVER_FUNDING_LAMPORTS,
        )?;

        let report_file = lookup("REPORT_FILE").map(PathBuf::from);

        Ok(Self {
            rpc_url,
            wallet_path,
            program_id,
            commitment,
            token,
            receiver_funding_lamports,
            report_file,
        })
    }

    pub fn cluster(&self) -> Cluster {
        Cluster::from_rpc_url(&self.rpc_url)
    }

    pub fn load_payer(&self) -> Result<Keypair, ConfigError> {
        read_keypair_file(&self.wallet_path).map_err(|e| ConfigError::Keypair {
            path: self.wallet_path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn expand_home(path: &str, home: Option<String>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

fn parse_commitment(value: &str) -> Result<CommitmentConfig, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        _ => Err(ConfigError::Invalid {
            key: "COMMITMENT",
            value: value.to_string(),
            reason: "expected processed, confirmed or finalized".to_string(),
        }),
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
