use crate::advanced::instructions::{
    self, KycParams, ProfileParams, TwoFactorParams, UserInstruction,
};
use crate::basic::profile::UserProfile;
use crate::codec::FieldLimits;
use crate::core::connection::SolConnection;
use crate::core::signer::ProfileSigner;
use crate::error::{Result, SdkError};
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

fn build(
    profile: &UserProfile,
    instruction: UserInstruction,
    limits: FieldLimits,
) -> Result<Instruction> {
    let ix = instructions::build_instruction(
        &profile.program_id,
        &profile.authority,
        &instruction,
        limits,
    )?;
    debug!(
        action = ?instruction.action(),
        profile = %profile.address,
        bump = profile.bump,
        authority = %profile.authority,
        payload_len = ix.data.len(),
        "encoded profile instruction"
    );
    Ok(ix)
}

async fn unsigned_transaction(
    connection: &impl SolConnection,
    ix: Instruction,
    payer: &Pubkey,
) -> Result<Transaction> {
    let recent_blockhash = connection.get_latest_blockhash().await.map_err(|e| {
        warn!(error = %e, "failed to fetch latest blockhash");
        SdkError::Connection(e.to_string())
    })?;
    let message = Message::new_with_blockhash(&[ix], Some(payer), &recent_blockhash);
    Ok(Transaction::new_unsigned(message))
}

async fn sign_and_send(
    connection: &impl SolConnection,
    signer: &impl ProfileSigner,
    profile: &UserProfile,
    ix: Instruction,
) -> Result<Signature> {
    if signer.pubkey() != profile.authority {
        return Err(SdkError::Signer(format!(
            "signer {} is not the profile authority {}",
            signer.pubkey(),
            profile.authority
        )));
    }

    let mut tx = unsigned_transaction(connection, ix, &profile.authority).await?;
    let recent_blockhash = tx.message.recent_blockhash;
    signer
        .sign_transaction(&mut tx, recent_blockhash)
        .await
        .map_err(SdkError::Signer)?;

    let signature = connection.send_transaction(&tx).await.map_err(|e| {
        warn!(profile = %profile.address, error = %e, "transaction failed");
        SdkError::Connection(e.to_string())
    })?;
    info!(%signature, profile = %profile.address, "transaction submitted");
    Ok(signature)
}

fn required(field: &str, value: &Option<String>) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| SdkError::InvalidArgument(format!("{field} required")))
}

#[derive(Debug, Clone, Default)]
struct ProfileFields {
    full_name: Option<String>,
    email: Option<String>,
    role: u8,
}

impl ProfileFields {
    fn params(&self) -> Result<ProfileParams> {
        Ok(ProfileParams {
            full_name: required("full_name", &self.full_name)?,
            email: required("email", &self.email)?,
            role: self.role,
        })
    }
}

pub struct CreateProfileBuilder<'a> {
    profile: &'a UserProfile,
    fields: ProfileFields,
    limits: FieldLimits,
}

impl<'a> CreateProfileBuilder<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            profile,
            fields: ProfileFields::default(),
            limits: FieldLimits::default(),
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.fields.full_name = Some(full_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.fields.email = Some(email.into());
        self
    }

    /// Role code (0 = user, 1 = moderator, ...); defaults to 0
    pub fn with_role(mut self, role: u8) -> Self {
        self.fields.role = role;
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        build(
            self.profile,
            UserInstruction::CreateProfile(self.fields.params()?),
            self.limits,
        )
    }

    pub async fn build_transaction(&self, connection: &impl SolConnection) -> Result<Transaction> {
        unsigned_transaction(connection, self.instruction()?, &self.profile.authority).await
    }

    pub async fn submit(
        &self,
        connection: &impl SolConnection,
        signer: &impl ProfileSigner,
    ) -> Result<Signature> {
        sign_and_send(connection, signer, self.profile, self.instruction()?).await
    }
}

pub struct UpdateProfileBuilder<'a> {
    profile: &'a UserProfile,
    fields: ProfileFields,
    limits: FieldLimits,
}

impl<'a> UpdateProfileBuilder<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            profile,
            fields: ProfileFields::default(),
            limits: FieldLimits::default(),
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.fields.full_name = Some(full_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.fields.email = Some(email.into());
        self
    }

    pub fn with_role(mut self, role: u8) -> Self {
        self.fields.role = role;
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        build(
            self.profile,
            UserInstruction::UpdateProfile(self.fields.params()?),
            self.limits,
        )
    }

    pub async fn build_transaction(&self, connection: &impl SolConnection) -> Result<Transaction> {
        unsigned_transaction(connection, self.instruction()?, &self.profile.authority).await
    }

    pub async fn submit(
        &self,
        connection: &impl SolConnection,
        signer: &impl ProfileSigner,
    ) -> Result<Signature> {
        sign_and_send(connection, signer, self.profile, self.instruction()?).await
    }
}

pub struct EnableTwoFactorBuilder<'a> {
    profile: &'a UserProfile,
    secret: Option<String>,
    backup_codes: Vec<String>,
    limits: FieldLimits,
}

impl<'a> EnableTwoFactorBuilder<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            profile,
            secret: None,
            backup_codes: Vec::new(),
            limits: FieldLimits::default(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_backup_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backup_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_backup_code(mut self, code: impl Into<String>) -> Self {
        self.backup_codes.push(code.into());
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let params = TwoFactorParams {
            secret: required("secret", &self.secret)?,
            backup_codes: self.backup_codes.clone(),
        };
        build(self.profile, UserInstruction::EnableTwoFactor(params), self.limits)
    }

    pub async fn build_transaction(&self, connection: &impl SolConnection) -> Result<Transaction> {
        unsigned_transaction(connection, self.instruction()?, &self.profile.authority).await
    }

    pub async fn submit(
        &self,
        connection: &impl SolConnection,
        signer: &impl ProfileSigner,
    ) -> Result<Signature> {
        sign_and_send(connection, signer, self.profile, self.instruction()?).await
    }
}

pub struct VerifyKycBuilder<'a> {
    profile: &'a UserProfile,
    document_type: Option<String>,
    document_number: Option<String>,
    verified_at: Option<i64>,
    limits: FieldLimits,
}

impl<'a> VerifyKycBuilder<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            profile,
            document_type: None,
            document_number: None,
            verified_at: None,
            limits: FieldLimits::default(),
        }
    }

    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    pub fn with_document_number(mut self, document_number: impl Into<String>) -> Self {
        self.document_number = Some(document_number.into());
        self
    }

    /// Verification time as a unix timestamp in seconds
    pub fn with_verified_at(mut self, verified_at: i64) -> Self {
        self.verified_at = Some(verified_at);
        self
    }

    /// Stamp the verification with the local clock
    pub fn verified_now(mut self) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        self.verified_at = Some(now);
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let params = KycParams {
            document_type: required("document_type", &self.document_type)?,
            document_number: required("document_number", &self.document_number)?,
            verified_at: self
                .verified_at
                .ok_or_else(|| SdkError::InvalidArgument("verified_at required".to_string()))?,
        };
        build(self.profile, UserInstruction::VerifyKyc(params), self.limits)
    }

    pub async fn build_transaction(&self, connection: &impl SolConnection) -> Result<Transaction> {
        unsigned_transaction(connection, self.instruction()?, &self.profile.authority).await
    }

    pub async fn submit(
        &self,
        connection: &impl SolConnection,
        signer: &impl ProfileSigner,
    ) -> Result<Signature> {
        sign_and_send(connection, signer, self.profile, self.instruction()?).await
    }
}
