use assert_matches::assert_matches;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use unity_vault_sdk::{
    core::connection::SolConnection, ProfileRecord, SdkError, UserInstruction, UserProfile,
};

mod common;
use common::{pack_profile, setup_test_context, PROFILE_ACCOUNT_SIZE};

async fn create_alice(
    context: &common::TestContext,
    owner: &Keypair,
) -> UserProfile {
    let profile = UserProfile::derive(owner.pubkey(), context.program_id).unwrap();
    profile
        .create()
        .with_full_name("Alice Smith")
        .with_email("alice@example.com")
        .with_role(0)
        .submit(context, owner)
        .await
        .unwrap();
    profile
}

#[tokio::test]
async fn test_fetch_before_create_is_none() {
    let context = setup_test_context();
    let profile = UserProfile::derive(Pubkey::new_unique(), context.program_id).unwrap();

    assert_eq!(profile.fetch(&context).await.unwrap(), None);
    assert!(!profile.exists(&context).await.unwrap());
    assert_matches!(
        profile.fetch_raw(&context).await,
        Err(SdkError::AccountNotFound(key)) if key == profile.address
    );
}

#[tokio::test]
async fn test_create_profile_round_trip() {
    let context = setup_test_context();
    let owner = Keypair::new();
    let profile = create_alice(&context, &owner).await;

    let record = profile.fetch(&context).await.unwrap().unwrap();
    assert!(record.initialized);
    assert_eq!(record.authority, owner.pubkey());
    assert_eq!(record.full_name, "Alice Smith");
    assert_eq!(record.email, "alice@example.com");
    assert_eq!(record.role, 0);
    assert!(!record.two_factor_enabled);
    assert!(!record.kyc_verified);
    assert_eq!(record.created_at, record.updated_at);
    assert!(profile.exists(&context).await.unwrap());
}

#[tokio::test]
async fn test_round_trip_varied_inputs() {
    let context = setup_test_context();
    let long_name = "n".repeat(unity_vault_sdk::core::constants::DEFAULT_MAX_STRING_LEN);
    let cases: Vec<(&str, &str, u8)> = vec![
        ("A", "a@b.c", 1),
        ("Zoë Ångström", "zoe@例え.jp", 200),
        (long_name.as_str(), "long@example.com", u8::MAX),
    ];

    for (full_name, email, role) in cases {
        let owner = Keypair::new();
        let profile = UserProfile::derive(owner.pubkey(), context.program_id).unwrap();
        profile
            .create()
            .with_full_name(full_name)
            .with_email(email)
            .with_role(role)
            .submit(&context, &owner)
            .await
            .unwrap();

        let record = profile.fetch(&context).await.unwrap().unwrap();
        assert_eq!(
            (record.full_name.as_str(), record.email.as_str(), record.role),
            (full_name, email, role)
        );
    }
}

#[tokio::test]
async fn test_update_two_factor_and_kyc() {
    let context = setup_test_context();
    let owner = Keypair::new();
    let profile = create_alice(&context, &owner).await;

    profile
        .update()
        .with_full_name("Alice Jones")
        .with_email("alice.jones@example.com")
        .with_role(2)
        .submit(&context, &owner)
        .await
        .unwrap();

    profile
        .enable_two_factor()
        .with_secret("JBSWY3DPEHPK3PXP")
        .with_backup_codes(["1234-5678", "8765-4321"])
        .add_backup_code("0000-1111")
        .submit(&context, &owner)
        .await
        .unwrap();

    profile
        .verify_kyc()
        .with_document_type("passport")
        .with_document_number("X1234567")
        .with_verified_at(1_700_000_500)
        .submit(&context, &owner)
        .await
        .unwrap();

    let record = profile.fetch(&context).await.unwrap().unwrap();
    assert_eq!(record.full_name, "Alice Jones");
    assert_eq!(record.email, "alice.jones@example.com");
    assert_eq!(record.role, 2);
    assert!(record.two_factor_enabled);
    assert_eq!(record.two_factor_secret, "JBSWY3DPEHPK3PXP");
    assert_eq!(record.backup_codes, vec!["1234-5678", "8765-4321", "0000-1111"]);
    assert!(record.kyc_verified);
    assert_eq!(record.kyc_document_type, "passport");
    assert_eq!(record.kyc_document_number, "X1234567");
    assert_eq!(record.kyc_verified_at, 1_700_000_500);
    assert!(record.updated_at > record.created_at);
}

#[tokio::test]
async fn test_signer_must_be_authority() {
    let context = setup_test_context();
    let owner = Keypair::new();
    let intruder = Keypair::new();
    let profile = UserProfile::derive(owner.pubkey(), context.program_id).unwrap();

    let result = profile
        .create()
        .with_full_name("Mallory")
        .with_email("mallory@example.com")
        .submit(&context, &intruder)
        .await;
    assert_matches!(result, Err(SdkError::Signer(_)));
    assert!(context.sent_transactions().await.is_empty());
}

#[tokio::test]
async fn test_missing_and_invalid_arguments_not_sent() {
    let context = setup_test_context();
    let owner = Keypair::new();
    let profile = UserProfile::derive(owner.pubkey(), context.program_id).unwrap();

    assert_matches!(
        profile.create().with_email("a@b.c").submit(&context, &owner).await,
        Err(SdkError::InvalidArgument(_))
    );
    assert_matches!(
        profile
            .create()
            .with_full_name("")
            .with_email("a@b.c")
            .submit(&context, &owner)
            .await,
        Err(SdkError::InvalidArgument(_))
    );
    assert_matches!(
        profile
            .verify_kyc()
            .with_document_type("passport")
            .with_document_number("X1")
            .instruction(),
        Err(SdkError::InvalidArgument(_))
    );
    assert!(context.sent_transactions().await.is_empty());
}

#[tokio::test]
async fn test_program_rejections_surface_as_connection_errors() {
    let context = setup_test_context();
    let owner = Keypair::new();
    let profile = create_alice(&context, &owner).await;

    // second create for the same authority
    let result = profile
        .create()
        .with_full_name("Alice")
        .with_email("alice@example.com")
        .submit(&context, &owner)
        .await;
    assert_matches!(result, Err(SdkError::Connection(_)));

    // update before create
    let stranger = Keypair::new();
    let other = UserProfile::derive(stranger.pubkey(), context.program_id).unwrap();
    let result = other
        .update()
        .with_full_name("Nobody")
        .with_email("nobody@example.com")
        .submit(&context, &stranger)
        .await;
    assert_matches!(result, Err(SdkError::Connection(_)));
}

#[tokio::test]
async fn test_build_transaction_is_unsigned_with_blockhash() {
    let context = setup_test_context();
    let owner = Keypair::new();
    let profile = UserProfile::derive(owner.pubkey(), context.program_id).unwrap();

    let tx = profile
        .create()
        .with_full_name("Alice Smith")
        .with_email("alice@example.com")
        .build_transaction(&context)
        .await
        .unwrap();

    assert_eq!(tx.message.recent_blockhash, context.blockhash());
    assert_eq!(tx.message.account_keys[0], owner.pubkey());
    assert_eq!(tx.message.instructions.len(), 1);
    assert!(!tx.is_signed());

    let data = &tx.message.instructions[0].data;
    assert_matches!(
        UserInstruction::unpack(data),
        Ok(UserInstruction::CreateProfile(params)) if params.full_name == "Alice Smith"
    );
}

#[tokio::test]
async fn test_corrupt_account_is_parse_error() {
    let context = setup_test_context();
    let profile = UserProfile::derive(Pubkey::new_unique(), context.program_id).unwrap();

    let record = ProfileRecord {
        initialized: true,
        authority: profile.authority,
        full_name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        ..ProfileRecord::default()
    };
    let mut data = pack_profile(&record);
    data.truncate(data.len() - 3);
    context.set_account_data(profile.address, data).await;

    let err = profile.fetch(&context).await.unwrap_err();
    assert_matches!(err, SdkError::TruncatedBuffer { .. });
    assert!(err.is_account_parse_error());
}

#[tokio::test]
async fn test_funded_but_empty_pda_is_not_created() {
    let context = setup_test_context();
    let owner = Keypair::new();
    let profile = UserProfile::derive(owner.pubkey(), context.program_id).unwrap();

    context.fund_account(profile.address, 1_000_000).await;
    assert_eq!(profile.fetch(&context).await.unwrap(), None);
    assert!(!profile.exists(&context).await.unwrap());
    assert!(profile.fetch_raw(&context).await.unwrap().is_empty());

    // program-owned but never written
    context.set_account_data(profile.address, Vec::new()).await;
    assert_eq!(profile.fetch(&context).await.unwrap(), None);
    assert!(!profile.exists(&context).await.unwrap());

    // creation still goes through once the address is funded
    context.fund_account(profile.address, 1_000_000).await;
    create_alice(&context, &owner).await;
    assert!(profile.exists(&context).await.unwrap());
}

#[tokio::test]
async fn test_foreign_owned_account_is_not_decoded() {
    let context = setup_test_context();
    let profile = UserProfile::derive(Pubkey::new_unique(), context.program_id).unwrap();

    // bytes that would fail to parse if they reached the decoder
    let account = Account {
        lamports: 1,
        data: vec![0xff; 16],
        owner: Pubkey::new_unique(),
        executable: false,
        rent_epoch: 0,
    };
    context.set_account(profile.address, account).await;
    assert_eq!(profile.fetch(&context).await.unwrap(), None);
    assert!(!profile.exists(&context).await.unwrap());
}

#[test]
fn test_empty_bytes_still_fail_decode() {
    let err = ProfileRecord::decode(&[]).unwrap_err();
    assert_matches!(err, SdkError::EmptyAccount);
    assert!(err.is_account_parse_error());
}

#[tokio::test]
async fn test_allocated_but_uninitialized_account() {
    let context = setup_test_context();
    let profile = UserProfile::derive(Pubkey::new_unique(), context.program_id).unwrap();
    context
        .set_account_data(profile.address, vec![0u8; PROFILE_ACCOUNT_SIZE])
        .await;

    let record = profile.fetch(&context).await.unwrap().unwrap();
    assert!(!record.initialized);
    assert!(!profile.exists(&context).await.unwrap());
}

#[tokio::test]
async fn test_raw_account_has_fixed_allocation() -> anyhow::Result<()> {
    let context = setup_test_context();
    let owner = Keypair::new();
    let profile = create_alice(&context, &owner).await;

    let raw = profile.fetch_raw(&context).await?;
    assert_eq!(raw.len(), PROFILE_ACCOUNT_SIZE);
    assert_eq!(raw[0], 1);
    assert_eq!(&raw[1..33], owner.pubkey().as_ref());
    assert_eq!(&raw[33..37], &[11, 0, 0, 0]);
    assert_eq!(&raw[37..48], b"Alice Smith");

    let account = context.get_account(&profile.address).await.unwrap();
    assert!(account.is_some());
    Ok(())
}
