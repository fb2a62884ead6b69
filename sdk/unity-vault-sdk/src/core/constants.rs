use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

// Deployed Unity Vault program (devnet / localnet)
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("89Lei4JF8Ga19BKsk3WUw1q25bchBupzyKyMZtw43KQ3");

/// Seed prefix of the profile PDA: `["user_profile", authority]`
pub const PROFILE_SEED: &[u8] = b"user_profile";

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";

/// Upper bound on encoded string payloads, in bytes
pub const DEFAULT_MAX_STRING_LEN: usize = 512;

/// Upper bound on entries in an encoded string list
pub const DEFAULT_MAX_LIST_LEN: usize = 32;

/// Native system program, passed to `CreateProfile` to allocate the PDA
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

pub const PUBKEY_LEN: usize = 32;

/// Length of `[domain_tag, action_tag]`
pub const INSTRUCTION_HEADER_LEN: usize = 2;
