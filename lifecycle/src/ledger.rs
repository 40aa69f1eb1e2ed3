//! The narrow interface through which the lifecycle reaches ledger state.

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::SignerError,
    transaction::{Transaction, TransactionError},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ClientError: {0}")]
    Client(Box<ClientError>),

    #[error("TransactionError: {0}")]
    Transaction(Box<TransactionError>),

    #[error("SignerError: {0}")]
    Signer(#[from] SignerError),
}

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        match err.get_transaction_error() {
            Some(tx_err) => LedgerError::Transaction(Box::new(tx_err)),
            None => LedgerError::Client(Box::new(err)),
        }
    }
}

impl From<TransactionError> for LedgerError {
    fn from(err: TransactionError) -> Self {
        LedgerError::Transaction(Box::new(err))
    }
}

/// Remote ledger access. Implementations must not cache: every read goes to
/// the ledger, and `submit_and_confirm` returns only once the transaction has
/// reached the implementation's commitment level.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    async fn submit_and_confirm(&self, transaction: Transaction)
        -> Result<Signature, LedgerError>;

    /// `None` when no account exists at `address`.
    async fn read_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError>;

    /// Lamport balance; zero for a missing account.
    async fn read_balance(&self, address: &Pubkey) -> Result<u64, LedgerError>;

    async fn send_instructions(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<Signature, LedgerError> {
        let blockhash = self.latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(instructions, Some(payer));
        transaction.try_sign(signers, blockhash)?;
        self.submit_and_confirm(transaction).await
    }
}
