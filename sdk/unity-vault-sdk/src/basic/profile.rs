use crate::basic::actions::{
    CreateProfileBuilder, EnableTwoFactorBuilder, UpdateProfileBuilder, VerifyKycBuilder,
};
use crate::core::connection::SolConnection;
use crate::core::constants::DEFAULT_PROGRAM_ID;
use crate::error::Result;
use crate::types::ProfileRecord;
use crate::utils;
use solana_sdk::pubkey::Pubkey;

/// Handle on a user's profile account: the authority it belongs to and the
/// PDA where the program keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserProfile {
    /// Profile PDA (`["user_profile", authority]`)
    pub address: Pubkey,

    /// PDA bump seed
    pub bump: u8,

    /// Wallet that owns and signs for the profile
    pub authority: Pubkey,

    /// Program ID of the Unity Vault program
    pub program_id: Pubkey,
}

impl UserProfile {
    /// Derive the profile handle for `authority` under `program_id`
    pub fn derive(authority: Pubkey, program_id: Pubkey) -> Result<Self> {
        let derived = utils::derive_profile_pda(&authority, &program_id)?;
        Ok(Self {
            address: derived.address,
            bump: derived.bump,
            authority,
            program_id,
        })
    }

    /// Derive against the default deployed program
    pub fn for_authority(authority: Pubkey) -> Result<Self> {
        Self::derive(authority, DEFAULT_PROGRAM_ID)
    }

    /// Fetch and decode the profile. `Ok(None)` until the profile is created,
    /// including while the PDA holds only lamports.
    pub async fn fetch(&self, connection: &impl SolConnection) -> Result<Option<ProfileRecord>> {
        utils::fetch_profile(connection, &self.address, &self.program_id).await
    }

    /// Raw account bytes
    pub async fn fetch_raw(&self, connection: &impl SolConnection) -> Result<Vec<u8>> {
        utils::fetch_profile_account(connection, &self.address).await
    }

    /// Whether an initialized profile exists on-chain
    pub async fn exists(&self, connection: &impl SolConnection) -> Result<bool> {
        Ok(self
            .fetch(connection)
            .await?
            .is_some_and(|record| record.initialized))
    }

    pub fn create(&self) -> CreateProfileBuilder<'_> {
        CreateProfileBuilder::new(self)
    }

    pub fn update(&self) -> UpdateProfileBuilder<'_> {
        UpdateProfileBuilder::new(self)
    }

    pub fn enable_two_factor(&self) -> EnableTwoFactorBuilder<'_> {
        EnableTwoFactorBuilder::new(self)
    }

    pub fn verify_kyc(&self) -> VerifyKycBuilder<'_> {
        VerifyKycBuilder::new(self)
    }
}
