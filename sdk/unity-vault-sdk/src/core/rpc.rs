use crate::core::config::ClientConfig;
use crate::core::connection::SolConnection;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::error::Error;

/// [`SolConnection`] backed by a JSON-RPC node.
pub struct RpcConnection {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(config: &ClientConfig) -> Self {
        let commitment = config.commitment_config();
        let client = match config.timeout() {
            Some(timeout) => RpcClient::new_with_timeout_and_commitment(
                config.rpc_url.clone(),
                timeout,
                commitment,
            ),
            None => RpcClient::new_with_commitment(config.rpc_url.clone(), commitment),
        };
        Self { client, commitment }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

#[async_trait]
impl SolConnection for RpcConnection {
    async fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        let signature = self.client.send_and_confirm_transaction(tx).await?;
        Ok(signature)
    }

    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .get_account_with_commitment(pubkey, self.commitment)
            .await?;
        Ok(response.value)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Box<dyn Error + Send + Sync>> {
        Ok(self.client.get_latest_blockhash().await?)
    }
}
