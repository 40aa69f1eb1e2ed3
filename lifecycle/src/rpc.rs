use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use tracing::debug;

use crate::ledger::{Ledger, LedgerError};

/// [`Ledger`] over a JSON-RPC node. Reads and confirmations use the
/// commitment the client was built with.
pub struct RpcLedger {
    client: RpcClient,
}

impl Debug for RpcLedger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RpcLedger {{ url: {:?} }}", self.client.url())
    }
}

impl RpcLedger {
    pub fn new<U: ToString>(url: U, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url.to_string(), commitment),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.client.commitment()
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn submit_and_confirm(
        &self,
        transaction: Transaction,
    ) -> Result<Signature, LedgerError> {
        let signature = self.client.send_and_confirm_transaction(&transaction).await?;
        debug!(%signature, "transaction confirmed");
        Ok(signature)
    }

    async fn read_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await?;
        Ok(response.value)
    }

    async fn read_balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        let response = self
            .client
            .get_balance_with_commitment(address, self.client.commitment())
            .await?;
        Ok(response.value)
    }
}
