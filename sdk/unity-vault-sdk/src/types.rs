use crate::codec::FieldCursor;
use crate::core::constants::PUBKEY_LEN;
use crate::error::{Result, SdkError};
use solana_sdk::pubkey::Pubkey;

/// Smallest possible profile account: every string and list empty.
pub const MIN_PROFILE_LEN: usize = 1 + PUBKEY_LEN // initialized, authority
    + 4 + 4 + 1 + 1 // full_name, email, role, status
    + 1 + 4 + 4 // two_factor_enabled, two_factor_secret, backup_codes
    + 1 + 1 + 4 + 4 + 8 // kyc_verified, kyc_status, kyc_document_*, kyc_verified_at
    + 1 + 8 + 8; // accredited, created_at, updated_at

/// Decoded user profile account.
///
/// When `initialized` is false the remaining fields carry no meaning and
/// must not be relied upon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    pub initialized: bool,
    pub authority: Pubkey,
    pub full_name: String,
    pub email: String,
    pub role: u8,
    pub status: u8,
    pub two_factor_enabled: bool,
    pub two_factor_secret: String,
    pub backup_codes: Vec<String>,
    pub kyc_verified: bool,
    pub kyc_status: u8,
    pub kyc_document_type: String,
    pub kyc_document_number: String,
    pub kyc_verified_at: i64,
    pub accredited: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProfileRecord {
    /// Decode raw account bytes, left to right, one field at a time.
    ///
    /// Empty input means the account does not exist yet and fails with
    /// [`SdkError::EmptyAccount`]; running out of bytes part-way fails with
    /// [`SdkError::TruncatedBuffer`]. Bytes after `updated_at` are ignored.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Err(SdkError::EmptyAccount);
        }

        let mut cursor = FieldCursor::new(raw);
        Ok(Self {
            initialized: cursor.read_bool("initialized")?,
            authority: Pubkey::new_from_array(cursor.read_array()?),
            full_name: cursor.read_string()?,
            email: cursor.read_string()?,
            role: cursor.read_u8()?,
            status: cursor.read_u8()?,
            two_factor_enabled: cursor.read_bool("two_factor_enabled")?,
            two_factor_secret: cursor.read_string()?,
            backup_codes: cursor.read_string_list()?,
            kyc_verified: cursor.read_bool("kyc_verified")?,
            kyc_status: cursor.read_u8()?,
            kyc_document_type: cursor.read_string()?,
            kyc_document_number: cursor.read_string()?,
            kyc_verified_at: cursor.read_i64()?,
            accredited: cursor.read_bool("accredited")?,
            created_at: cursor.read_i64()?,
            updated_at: cursor.read_i64()?,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Parse a profile account, see [`ProfileRecord::decode`].
pub fn decode_profile(raw: &[u8]) -> Result<ProfileRecord> {
    ProfileRecord::decode(raw)
}
