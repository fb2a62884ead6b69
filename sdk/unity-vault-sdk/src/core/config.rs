use crate::codec::FieldLimits;
use crate::core::constants::{DEFAULT_PROGRAM_ID, DEFAULT_RPC_URL};
use crate::error::{Result, SdkError};
use serde::{Deserialize, Deserializer};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Client configuration, injected into [`RpcConnection`](crate::core::rpc::RpcConnection)
/// and the transaction builders. The codec never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default = "default_program_id", deserialize_with = "deserialize_pubkey")]
    pub program_id: Pubkey,

    #[serde(default = "default_commitment", deserialize_with = "deserialize_commitment")]
    pub commitment: CommitmentLevel,

    /// Path to a JSON keypair file (byte array) for the profile authority
    #[serde(default)]
    pub keypair_path: Option<PathBuf>,

    /// RPC request timeout, in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub limits: FieldLimits,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_program_id() -> Pubkey {
    DEFAULT_PROGRAM_ID
}

fn default_commitment() -> CommitmentLevel {
    CommitmentLevel::Confirmed
}

fn deserialize_pubkey<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Pubkey, D::Error> {
    let s = String::deserialize(deserializer)?;
    Pubkey::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_commitment<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<CommitmentLevel, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_commitment(&s).map_err(serde::de::Error::custom)
}

fn parse_commitment(s: &str) -> Result<CommitmentLevel> {
    match s.to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentLevel::Processed),
        "confirmed" => Ok(CommitmentLevel::Confirmed),
        "finalized" => Ok(CommitmentLevel::Finalized),
        other => Err(SdkError::Config(format!("unknown commitment level: {other}"))),
    }
}

impl ClientConfig {
    pub fn new(rpc_url: impl Into<String>, program_id: Pubkey) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            program_id,
            commitment: default_commitment(),
            keypair_path: None,
            timeout_secs: None,
            limits: FieldLimits::default(),
        }
    }

    /// Build from `RPC_URL`, `PROGRAM_ID`, `WALLET_PATH` and `COMMITMENT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_url = lookup("RPC_URL").unwrap_or_else(default_rpc_url);
        let program_id = match lookup("PROGRAM_ID") {
            Some(id) => Pubkey::from_str(&id)
                .map_err(|e| SdkError::Config(format!("invalid PROGRAM_ID {id}: {e}")))?,
            None => default_program_id(),
        };

        let mut config = Self::new(rpc_url, program_id);
        if let Some(level) = lookup("COMMITMENT") {
            config.commitment = parse_commitment(&level)?;
        }
        config.keypair_path = lookup("WALLET_PATH").map(PathBuf::from);
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn commitment_config(&self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: self.commitment,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn load_keypair(&self) -> Result<Keypair> {
        let path = self
            .keypair_path
            .as_ref()
            .ok_or_else(|| SdkError::Config("keypair_path not set".to_string()))?;
        read_keypair_file(path)
            .map_err(|e| SdkError::Config(format!("failed to read {}: {e}", path.display())))
    }
}
