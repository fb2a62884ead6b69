// Example: creating a profile and enabling two-factor auth
//
// Reads RPC_URL, PROGRAM_ID and WALLET_PATH from the environment, then:
// 1. Derives the profile PDA for the wallet
// 2. Submits CreateProfile
// 3. Submits EnableTwoFactor
//
// RUST_LOG=unity_vault_sdk=debug cargo run --example create_profile

use tracing_subscriber::EnvFilter;
use solana_sdk::signature::Signer;
use unity_vault_sdk::{ClientConfig, RpcConnection, UserProfile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let wallet = config.load_keypair()?;
    let connection = RpcConnection::new(&config);

    let profile = UserProfile::derive(wallet.pubkey(), config.program_id)?;
    println!("Profile PDA: {} (bump {})", profile.address, profile.bump);

    let signature = profile
        .create()
        .with_full_name("Alice Smith")
        .with_email("alice@example.com")
        .with_role(0)
        .with_limits(config.limits)
        .submit(&connection, &wallet)
        .await?;
    println!("Created profile: {signature}");

    let signature = profile
        .enable_two_factor()
        .with_secret("JBSWY3DPEHPK3PXP")
        .with_backup_codes(["4821-0937", "1174-5520"])
        .with_limits(config.limits)
        .submit(&connection, &wallet)
        .await?;
    println!("Enabled two-factor: {signature}");

    Ok(())
}
