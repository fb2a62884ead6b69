// Example: fetching and decoding a profile account
//
// Usage: cargo run --example fetch_profile -- <AUTHORITY_PUBKEY>

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use unity_vault_sdk::{ClientConfig, RpcConnection, UserProfile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let authority = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: fetch_profile <AUTHORITY_PUBKEY>"))?;
    let authority = Pubkey::from_str(&authority)?;

    let config = ClientConfig::from_env()?;
    let connection = RpcConnection::new(&config);
    let profile = UserProfile::derive(authority, config.program_id)?;

    match profile.fetch(&connection).await? {
        None => println!("No profile at {}", profile.address),
        Some(record) if !record.initialized => {
            println!("Profile account {} is allocated but not initialized", profile.address)
        },
        Some(record) => {
            println!("Profile {}", profile.address);
            println!("  Name:        {}", record.full_name);
            println!("  Email:       {}", record.email);
            println!("  Role:        {}", record.role);
            println!("  Two-factor:  {}", record.two_factor_enabled);
            println!("  KYC:         {} ({})", record.kyc_verified, record.kyc_document_type);
            println!("  Accredited:  {}", record.accredited);
        },
    }

    Ok(())
}
