//! Unity Vault user instruction encoding.
//!
//! Wire layout: `[domain_tag: u8][action_tag: u8][args...]`. The tag pairs
//! are fixed by the on-chain program's ABI.

use crate::codec::{FieldCursor, FieldLimits, FieldWriter};
use crate::core::constants::{INSTRUCTION_HEADER_LEN, SYSTEM_PROGRAM_ID};
use crate::error::{Result, SdkError};
use crate::utils::derive_profile_pda;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

/// First header byte: which program subsystem handles the instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ProgramDomain {
    User = 0,
    Governance = 1,
    Community = 2,
    Lending = 3,
    Tokenization = 4,
}

/// Second header byte within [`ProgramDomain::User`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum UserAction {
    CreateProfile = 0,
    UpdateProfile = 1,
    EnableTwoFactor = 2,
    VerifyKyc = 3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileParams {
    pub full_name: String,
    pub email: String,
    /// Not checked against a role enumeration; the program owns that rule.
    pub role: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorParams {
    pub secret: String,
    pub backup_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycParams {
    pub document_type: String,
    pub document_number: String,
    /// Unix timestamp, seconds
    pub verified_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInstruction {
    /// Create the caller's profile
    ///
    /// Accounts:
    /// 0. `[writable]` Profile PDA (`["user_profile", authority]`)
    /// 1. `[writable, signer]` Authority (pays for the account)
    /// 2. `[]` System program
    CreateProfile(ProfileParams),

    /// Overwrite name, email and role
    ///
    /// Accounts:
    /// 0. `[writable]` Profile PDA
    /// 1. `[signer]` Authority
    UpdateProfile(ProfileParams),

    /// Store the TOTP secret and backup codes
    ///
    /// Accounts: same as `UpdateProfile`
    EnableTwoFactor(TwoFactorParams),

    /// Record a completed KYC check
    ///
    /// Accounts: same as `UpdateProfile`
    VerifyKyc(KycParams),
}

/// Encoded instruction data. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPayload(Vec<u8>);

impl InstructionPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn domain_tag(&self) -> u8 {
        self.0[0]
    }

    pub fn action_tag(&self) -> u8 {
        self.0[1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for InstructionPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<InstructionPayload> for Vec<u8> {
    fn from(payload: InstructionPayload) -> Self {
        payload.0
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SdkError::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(())
}

impl ProfileParams {
    fn validate(&self) -> Result<()> {
        require_non_empty("full_name", &self.full_name)?;
        require_non_empty("email", &self.email)
    }

    fn write(&self, w: &mut FieldWriter) -> Result<()> {
        w.write_string("full_name", &self.full_name)?
            .write_string("email", &self.email)?
            .write_u8(self.role);
        Ok(())
    }

    fn read(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(Self {
            full_name: cursor.read_string()?,
            email: cursor.read_string()?,
            role: cursor.read_u8()?,
        })
    }
}

impl TwoFactorParams {
    fn write(&self, w: &mut FieldWriter) -> Result<()> {
        w.write_string("secret", &self.secret)?
            .write_string_list("backup_codes", &self.backup_codes)?;
        Ok(())
    }

    fn read(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(Self {
            secret: cursor.read_string()?,
            backup_codes: cursor.read_string_list()?,
        })
    }
}

impl KycParams {
    fn write(&self, w: &mut FieldWriter) -> Result<()> {
        w.write_string("document_type", &self.document_type)?
            .write_string("document_number", &self.document_number)?
            .write_i64(self.verified_at);
        Ok(())
    }

    fn read(cursor: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(Self {
            document_type: cursor.read_string()?,
            document_number: cursor.read_string()?,
            verified_at: cursor.read_i64()?,
        })
    }
}

impl UserInstruction {
    pub fn domain(&self) -> ProgramDomain {
        ProgramDomain::User
    }

    pub fn action(&self) -> UserAction {
        match self {
            UserInstruction::CreateProfile(_) => UserAction::CreateProfile,
            UserInstruction::UpdateProfile(_) => UserAction::UpdateProfile,
            UserInstruction::EnableTwoFactor(_) => UserAction::EnableTwoFactor,
            UserInstruction::VerifyKyc(_) => UserAction::VerifyKyc,
        }
    }

    /// Only the profile fields carry a non-empty rule; the 2FA and KYC
    /// strings are passed through as given.
    pub fn validate(&self) -> Result<()> {
        match self {
            UserInstruction::CreateProfile(p) | UserInstruction::UpdateProfile(p) => p.validate(),
            UserInstruction::EnableTwoFactor(_) | UserInstruction::VerifyKyc(_) => Ok(()),
        }
    }

    pub fn pack(&self) -> Result<InstructionPayload> {
        self.pack_with_limits(FieldLimits::default())
    }

    pub fn pack_with_limits(&self, limits: FieldLimits) -> Result<InstructionPayload> {
        self.validate()?;

        let mut w = FieldWriter::new(limits);
        w.write_u8(self.domain().into()).write_u8(self.action().into());
        match self {
            UserInstruction::CreateProfile(p) | UserInstruction::UpdateProfile(p) => {
                p.write(&mut w)?
            },
            UserInstruction::EnableTwoFactor(p) => p.write(&mut w)?,
            UserInstruction::VerifyKyc(p) => p.write(&mut w)?,
        }
        Ok(InstructionPayload(w.into_bytes()))
    }

    /// Parse instruction data back into a [`UserInstruction`]. The whole
    /// input must be consumed.
    pub fn unpack(input: &[u8]) -> Result<Self> {
        if input.len() < INSTRUCTION_HEADER_LEN {
            return Err(SdkError::InvalidInstruction(format!(
                "expected {INSTRUCTION_HEADER_LEN}-byte header, got {} bytes",
                input.len()
            )));
        }

        let domain = ProgramDomain::try_from(input[0])
            .map_err(|_| SdkError::InvalidInstruction(format!("unknown domain tag {}", input[0])))?;
        if domain != ProgramDomain::User {
            return Err(SdkError::InvalidInstruction(format!(
                "unsupported domain {domain:?}"
            )));
        }
        let action = UserAction::try_from(input[1]).map_err(|_| {
            SdkError::InvalidInstruction(format!("unknown user action tag {}", input[1]))
        })?;

        let mut cursor = FieldCursor::new(&input[INSTRUCTION_HEADER_LEN..]);
        let instruction = match action {
            UserAction::CreateProfile => {
                UserInstruction::CreateProfile(ProfileParams::read(&mut cursor)?)
            },
            UserAction::UpdateProfile => {
                UserInstruction::UpdateProfile(ProfileParams::read(&mut cursor)?)
            },
            UserAction::EnableTwoFactor => {
                UserInstruction::EnableTwoFactor(TwoFactorParams::read(&mut cursor)?)
            },
            UserAction::VerifyKyc => UserInstruction::VerifyKyc(KycParams::read(&mut cursor)?),
        };

        if cursor.remaining() != 0 {
            return Err(SdkError::InvalidInstruction(format!(
                "{} trailing bytes after {action:?} arguments",
                cursor.remaining()
            )));
        }
        Ok(instruction)
    }

    fn account_metas(&self, profile_pda: Pubkey, authority: Pubkey) -> Vec<AccountMeta> {
        match self {
            UserInstruction::CreateProfile(_) => vec![
                AccountMeta::new(profile_pda, false),
                AccountMeta::new(authority, true),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
            _ => vec![
                AccountMeta::new(profile_pda, false),
                AccountMeta::new_readonly(authority, true),
            ],
        }
    }
}

//=============================================================================
// Payload encoders
//=============================================================================

pub fn encode_create_profile(full_name: &str, email: &str, role: u8) -> Result<InstructionPayload> {
    UserInstruction::CreateProfile(ProfileParams {
        full_name: full_name.to_string(),
        email: email.to_string(),
        role,
    })
    .pack()
}

pub fn encode_update_profile(full_name: &str, email: &str, role: u8) -> Result<InstructionPayload> {
    UserInstruction::UpdateProfile(ProfileParams {
        full_name: full_name.to_string(),
        email: email.to_string(),
        role,
    })
    .pack()
}

pub fn encode_enable_two_factor<S: AsRef<str>>(
    secret: &str,
    backup_codes: &[S],
) -> Result<InstructionPayload> {
    UserInstruction::EnableTwoFactor(TwoFactorParams {
        secret: secret.to_string(),
        backup_codes: backup_codes.iter().map(|c| c.as_ref().to_string()).collect(),
    })
    .pack()
}

pub fn encode_verify_kyc(
    document_type: &str,
    document_number: &str,
    verified_at: i64,
) -> Result<InstructionPayload> {
    UserInstruction::VerifyKyc(KycParams {
        document_type: document_type.to_string(),
        document_number: document_number.to_string(),
        verified_at,
    })
    .pack()
}

//=============================================================================
// Instruction builders
//=============================================================================

/// Build the full program instruction for `instruction`, signed by `authority`.
pub fn build_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    instruction: &UserInstruction,
    limits: FieldLimits,
) -> Result<Instruction> {
    let profile = derive_profile_pda(authority, program_id)?;
    let payload = instruction.pack_with_limits(limits)?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: instruction.account_metas(profile.address, *authority),
        data: payload.into_bytes(),
    })
}

pub fn create_profile(
    program_id: &Pubkey,
    authority: &Pubkey,
    params: ProfileParams,
) -> Result<Instruction> {
    build_instruction(
        program_id,
        authority,
        &UserInstruction::CreateProfile(params),
        FieldLimits::default(),
    )
}

pub fn update_profile(
    program_id: &Pubkey,
    authority: &Pubkey,
    params: ProfileParams,
) -> Result<Instruction> {
    build_instruction(
        program_id,
        authority,
        &UserInstruction::UpdateProfile(params),
        FieldLimits::default(),
    )
}

pub fn enable_two_factor(
    program_id: &Pubkey,
    authority: &Pubkey,
    params: TwoFactorParams,
) -> Result<Instruction> {
    build_instruction(
        program_id,
        authority,
        &UserInstruction::EnableTwoFactor(params),
        FieldLimits::default(),
    )
}

pub fn verify_kyc(
    program_id: &Pubkey,
    authority: &Pubkey,
    params: KycParams,
) -> Result<Instruction> {
    build_instruction(
        program_id,
        authority,
        &UserInstruction::VerifyKyc(params),
        FieldLimits::default(),
    )
}
