use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// SDK-specific error types for Unity Vault profile operations
#[derive(Debug, Error)]
pub enum SdkError {
    /// Caller-supplied value violates a precondition (e.g. empty required string)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A string or list exceeds the configured encoding limit
    #[error("Field `{field}` too large: {len} exceeds maximum of {max}")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A read would run past the end of the buffer
    #[error("Truncated buffer: needed {needed} bytes, {remaining} remaining")]
    TruncatedBuffer { needed: usize, remaining: usize },

    /// String payload is not valid UTF-8
    #[error("Invalid UTF-8 in string field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A fixed-width field holds a value outside its domain
    #[error("Malformed field `{field}`: unexpected byte {byte:#04x}")]
    MalformedField { field: &'static str, byte: u8 },

    /// Zero-length account data: the profile does not exist yet
    #[error("Account is empty")]
    EmptyAccount,

    /// No bump in [0, 255] produced an off-curve address
    #[error("Unable to find a viable program address bump seed")]
    DerivationExhausted,

    /// Instruction payload carries unknown tags or a trailing remainder
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    /// Account not found on-chain
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Connection or RPC error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Signing failed or the signer is not the expected authority
    #[error("Signer error: {0}")]
    Signer(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Decode-time failures, surfaced to callers as "cannot parse account".
    pub fn is_account_parse_error(&self) -> bool {
        matches!(
            self,
            SdkError::TruncatedBuffer { .. }
                | SdkError::InvalidUtf8(_)
                | SdkError::MalformedField { .. }
                | SdkError::EmptyAccount
        )
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
