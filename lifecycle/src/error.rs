use myspltoken_sdk::SdkError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::{
    ledger::LedgerError,
    orchestrator::{LifecycleStage, Step},
};

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("SdkError: {0}")]
    Sdk(#[from] SdkError),

    #[error("LedgerError: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{step} requires stage {required:?}, lifecycle is at {current:?}")]
    OutOfOrder {
        step: Step,
        required: LifecycleStage,
        current: LifecycleStage,
    },

    #[error("Expected {role} account {address} to exist")]
    AccountMissing { role: &'static str, address: Pubkey },

    #[error("{role} balance at {address}: expected {expected}, found {actual}")]
    BalanceMismatch {
        role: &'static str,
        address: Pubkey,
        expected: u64,
        actual: u64,
    },

    #[error("{role} balance {balance} cannot move by {quantity}")]
    AmountOutOfRange {
        role: &'static str,
        balance: u64,
        quantity: u64,
    },
}
