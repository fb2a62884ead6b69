#![allow(dead_code)]

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use unity_vault_sdk::core::constants::SYSTEM_PROGRAM_ID;
use unity_vault_sdk::{
    core::connection::SolConnection, derive_profile_pda, FieldLimits, FieldWriter, ProfileRecord,
    UserInstruction,
};

/// Fixed allocation the program makes for a profile account
pub const PROFILE_ACCOUNT_SIZE: usize = 1024;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Serialize a record in the program's account layout.
pub fn pack_profile(record: &ProfileRecord) -> Vec<u8> {
    let limits = FieldLimits {
        max_string_len: usize::MAX,
        max_list_len: usize::MAX,
    };
    let mut w = FieldWriter::new(limits);
    w.write_bool(record.initialized)
        .write_fixed(record.authority.as_ref());
    w.write_string("full_name", &record.full_name).unwrap();
    w.write_string("email", &record.email).unwrap();
    w.write_u8(record.role)
        .write_u8(record.status)
        .write_bool(record.two_factor_enabled);
    w.write_string("two_factor_secret", &record.two_factor_secret)
        .unwrap();
    w.write_string_list("backup_codes", &record.backup_codes)
        .unwrap();
    w.write_bool(record.kyc_verified).write_u8(record.kyc_status);
    w.write_string("kyc_document_type", &record.kyc_document_type)
        .unwrap();
    w.write_string("kyc_document_number", &record.kyc_document_number)
        .unwrap();
    w.write_i64(record.kyc_verified_at)
        .write_bool(record.accredited)
        .write_i64(record.created_at)
        .write_i64(record.updated_at);
    w.into_bytes()
}

/// In-memory stand-in for the network and the profile program. Executes
/// user instructions against simulated profile accounts.
pub struct TestContext {
    pub program_id: Pubkey,
    accounts: Arc<Mutex<HashMap<Pubkey, Account>>>,
    sent: Arc<Mutex<Vec<Transaction>>>,
    blockhash: Hash,
    clock: AtomicI64,
}

impl TestContext {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Arc::new(Mutex::new(HashMap::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            blockhash: Hash::new_unique(),
            clock: AtomicI64::new(1_700_000_000),
        }
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub async fn set_account_data(&self, pubkey: Pubkey, data: Vec<u8>) {
        let account = Account {
            lamports: 1,
            data,
            owner: self.program_id,
            executable: false,
            rent_epoch: 0,
        };
        self.accounts.lock().await.insert(pubkey, account);
    }

    /// Lamports sent to `pubkey` ahead of any program write: system-owned, no data
    pub async fn fund_account(&self, pubkey: Pubkey, lamports: u64) {
        let account = Account {
            lamports,
            data: Vec::new(),
            owner: SYSTEM_PROGRAM_ID,
            executable: false,
            rent_epoch: 0,
        };
        self.accounts.lock().await.insert(pubkey, account);
    }

    pub async fn set_account(&self, pubkey: Pubkey, account: Account) {
        self.accounts.lock().await.insert(pubkey, account);
    }

    pub async fn sent_transactions(&self) -> Vec<Transaction> {
        self.sent.lock().await.clone()
    }

    fn execute(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        profile_key: Pubkey,
        authority: Pubkey,
        instruction: UserInstruction,
    ) -> Result<(), String> {
        let expected = derive_profile_pda(&authority, &self.program_id).map_err(|e| e.to_string())?;
        if expected.address != profile_key {
            return Err("profile account is not the authority's PDA".to_string());
        }

        let now = self.clock.fetch_add(1, Ordering::SeqCst);
        let existing = accounts
            .get(&profile_key)
            .filter(|account| !account.data.is_empty())
            .map(|account| ProfileRecord::decode(&account.data))
            .transpose()
            .map_err(|e| e.to_string())?
            .filter(|record| record.initialized);

        let record = match (instruction, existing) {
            (UserInstruction::CreateProfile(_), Some(_)) => {
                return Err("profile already initialized".to_string())
            },
            (UserInstruction::CreateProfile(params), None) => ProfileRecord {
                initialized: true,
                authority,
                full_name: params.full_name,
                email: params.email,
                role: params.role,
                created_at: now,
                updated_at: now,
                ..ProfileRecord::default()
            },
            (_, None) => return Err("profile not initialized".to_string()),
            (_, Some(record)) if record.authority != authority => {
                return Err("authority mismatch".to_string())
            },
            (UserInstruction::UpdateProfile(params), Some(record)) => ProfileRecord {
                full_name: params.full_name,
                email: params.email,
                role: params.role,
                updated_at: now,
                ..record
            },
            (UserInstruction::EnableTwoFactor(params), Some(record)) => ProfileRecord {
                two_factor_enabled: true,
                two_factor_secret: params.secret,
                backup_codes: params.backup_codes,
                updated_at: now,
                ..record
            },
            (UserInstruction::VerifyKyc(params), Some(record)) => ProfileRecord {
                kyc_verified: true,
                kyc_status: 1,
                kyc_document_type: params.document_type,
                kyc_document_number: params.document_number,
                kyc_verified_at: params.verified_at,
                updated_at: now,
                ..record
            },
        };

        let mut data = pack_profile(&record);
        if data.len() > PROFILE_ACCOUNT_SIZE {
            return Err("profile exceeds account size".to_string());
        }
        data.resize(PROFILE_ACCOUNT_SIZE, 0);
        accounts.insert(
            profile_key,
            Account {
                lamports: 1,
                data,
                owner: self.program_id,
                executable: false,
                rent_epoch: 0,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl SolConnection for TestContext {
    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, BoxError> {
        tx.verify().map_err(|e| Box::new(e) as BoxError)?;
        if tx.message.recent_blockhash != self.blockhash {
            return Err("blockhash not found".into());
        }

        let keys = &tx.message.account_keys;
        let mut accounts = self.accounts.lock().await;
        // All-or-nothing, like a real transaction
        let mut staged = accounts.clone();
        for ix in &tx.message.instructions {
            if keys[ix.program_id_index as usize] != self.program_id {
                continue;
            }
            let profile_key = keys[ix.accounts[0] as usize];
            let authority_index = ix.accounts[1] as usize;
            if !tx.message.is_signer(authority_index) {
                return Err("authority did not sign".into());
            }
            let instruction =
                UserInstruction::unpack(&ix.data).map_err(|e| Box::new(e) as BoxError)?;
            self.execute(&mut staged, profile_key, keys[authority_index], instruction)?;
        }
        *accounts = staged;

        self.sent.lock().await.push(tx.clone());
        Ok(tx.signatures[0])
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, BoxError> {
        Ok(self.accounts.lock().await.get(pubkey).cloned())
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, BoxError> {
        Ok(self.blockhash)
    }
}

pub fn setup_test_context() -> TestContext {
    TestContext::new(unity_vault_sdk::core::constants::DEFAULT_PROGRAM_ID)
}
