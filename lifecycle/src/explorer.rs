//! Solana explorer links for confirmed transactions and accounts.

use std::fmt;

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use url::form_urlencoded;

const EXPLORER_BASE: &str = "https://explorer.solana.com";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cluster {
    MainnetBeta,
    Devnet,
    Testnet,
    Custom(String),
}

impl Cluster {
    /// Infer the cluster from an RPC endpoint. Anything that is not a public
    /// cluster endpoint is treated as a custom URL (local validators included).
    pub fn from_rpc_url(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.contains("devnet") {
            Cluster::Devnet
        } else if lower.contains("testnet") {
            Cluster::Testnet
        } else if lower.contains("mainnet") {
            Cluster::MainnetBeta
        } else {
            Cluster::Custom(url.to_string())
        }
    }

    fn query(&self) -> String {
        match self {
            Cluster::MainnetBeta => String::new(),
            Cluster::Devnet => "?cluster=devnet".to_string(),
            Cluster::Testnet => "?cluster=testnet".to_string(),
            Cluster::Custom(url) => format!(
                "?cluster=custom&customUrl={}",
                form_urlencoded::byte_serialize(url.as_bytes()).collect::<String>()
            ),
        }
    }

    pub fn tx_url(&self, signature: &Signature) -> String {
        format!("{}/tx/{}{}", EXPLORER_BASE, signature, self.query())
    }

    pub fn address_url(&self, address: &Pubkey) -> String {
        format!("{}/address/{}{}", EXPLORER_BASE, address, self.query())
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::Custom(url) => write!(f, "custom ({})", url),
        }
    }
}
