use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;

/// Abstraction for the profile authority that signs submissions.
/// This allows the SDK to work with:
/// 1. Local Keypairs (backend services, CLI)
/// 2. Remote signers (wallet adapters, HSM-backed services)
#[async_trait]
pub trait ProfileSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Sign `tx` in place against `recent_blockhash`.
    async fn sign_transaction(
        &self,
        tx: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<(), String>;
}

#[async_trait]
impl ProfileSigner for Keypair {
    fn pubkey(&self) -> Pubkey {
        Signer::pubkey(self)
    }

    async fn sign_transaction(
        &self,
        tx: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<(), String> {
        tx.try_sign(&[self], recent_blockhash)
            .map_err(|e| e.to_string())
    }
}
