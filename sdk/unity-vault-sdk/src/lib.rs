pub mod advanced;
pub mod basic;
pub mod codec;
pub mod core;
pub mod error;
pub mod types;
pub mod utils;

pub use crate::advanced::instructions::{
    encode_create_profile, encode_enable_two_factor, encode_update_profile, encode_verify_kyc,
    InstructionPayload, UserInstruction,
};
pub use crate::basic::profile::UserProfile;
pub use crate::codec::{FieldCursor, FieldLimits, FieldWriter};
pub use crate::core::config::ClientConfig;
pub use crate::core::connection::SolConnection;
pub use crate::core::rpc::RpcConnection;
pub use crate::core::signer::ProfileSigner;
pub use crate::error::{Result, SdkError};
pub use crate::types::{decode_profile, ProfileRecord};
pub use crate::utils::{
    derive_address, derive_profile_pda, fetch_account, fetch_profile, fetch_profile_account,
    DerivedAddress,
};
