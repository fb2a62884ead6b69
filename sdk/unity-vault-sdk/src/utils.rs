use crate::core::connection::SolConnection;
use crate::core::constants::PROFILE_SEED;
use crate::error::{Result, SdkError};
use crate::types::ProfileRecord;
use solana_sdk::account::Account;
use solana_sdk::pubkey::{Pubkey, MAX_SEED_LEN};
use tracing::{debug, warn};

//=============================================================================
// PDA Derivation Helpers
//=============================================================================

/// A program-owned address together with the bump that pushed it off-curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Derive the address for seeds `[seed, identity]` under `program_id`.
///
/// Bumps are tried from 255 downwards and the first off-curve hit wins, the
/// same search every other client of the program performs. Pure; the result
/// can be cached by its inputs.
pub fn derive_address(
    seed: &[u8],
    identity: &Pubkey,
    program_id: &Pubkey,
) -> Result<DerivedAddress> {
    if seed.len() > MAX_SEED_LEN {
        return Err(SdkError::InvalidArgument(format!(
            "seed is {} bytes, maximum is {}",
            seed.len(),
            MAX_SEED_LEN
        )));
    }

    let (address, bump) =
        Pubkey::try_find_program_address(&[seed, identity.as_ref()], program_id)
            .ok_or(SdkError::DerivationExhausted)?;
    Ok(DerivedAddress { address, bump })
}

/// Derive the profile PDA from the authority and program ID
pub fn derive_profile_pda(authority: &Pubkey, program_id: &Pubkey) -> Result<DerivedAddress> {
    derive_address(PROFILE_SEED, authority, program_id)
}

//=============================================================================
// Account Fetching & Parsing
//=============================================================================

/// Fetch the raw account at `address`, `AccountNotFound` when absent
pub async fn fetch_account(connection: &impl SolConnection, address: &Pubkey) -> Result<Account> {
    let account = connection
        .get_account(address)
        .await
        .map_err(|e| {
            warn!(%address, error = %e, "failed to fetch account");
            SdkError::Connection(e.to_string())
        })?
        .ok_or(SdkError::AccountNotFound(*address))?;

    debug!(%address, owner = %account.owner, len = account.data.len(), "fetched account");
    Ok(account)
}

/// Fetch profile account data from the blockchain
pub async fn fetch_profile_account(
    connection: &impl SolConnection,
    profile_pda: &Pubkey,
) -> Result<Vec<u8>> {
    Ok(fetch_account(connection, profile_pda).await?.data)
}

/// Fetch and decode a profile.
///
/// `Ok(None)` while the profile does not exist: no account at the PDA, an
/// account with no data (lamports sent to the address ahead of creation) or
/// an account the program does not own.
pub async fn fetch_profile(
    connection: &impl SolConnection,
    profile_pda: &Pubkey,
    program_id: &Pubkey,
) -> Result<Option<ProfileRecord>> {
    let account = match fetch_account(connection, profile_pda).await {
        Ok(account) => account,
        Err(SdkError::AccountNotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    if account.owner != *program_id || account.data.is_empty() {
        debug!(%profile_pda, owner = %account.owner, "profile not created yet");
        return Ok(None);
    }

    ProfileRecord::decode(&account.data).map(Some).map_err(|e| {
        warn!(%profile_pda, error = %e, "cannot parse profile account");
        e
    })
}
