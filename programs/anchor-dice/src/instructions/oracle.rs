use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};
use solana_program::ed25519_program;

use super::errors::ErrorCode;

const NUM_SIGNATURES_LEN: usize = 2; // count + padding
const OFFSETS_LEN: usize = 14;
const PUBKEY_LEN: usize = 32;
const SIGNATURE_LEN: usize = 64;

/// Offsets with this instruction index refer to the Ed25519 instruction itself.
const THIS_INSTRUCTION: u16 = u16::MAX;

/// Source of house-signed randomness. `verify` must succeed only when
/// `signature` is the signer's signature over exactly `message`.
pub trait SignatureOracle {
    fn verify(&self, signer: &Pubkey, message: &[u8], signature: &[u8; 64]) -> Result<()>;
}

/// Public key, signature and message carried by a single-signature
/// Ed25519 program instruction.
#[derive(Debug, PartialEq, Eq)]
pub struct Ed25519Payload<'a> {
    pub public_key: &'a [u8],
    pub signature: &'a [u8],
    pub message: &'a [u8],
}

impl Ed25519Payload<'_> {
    pub fn matches(&self, signer: &Pubkey, message: &[u8], signature: &[u8; 64]) -> bool {
        self.public_key == signer.to_bytes().as_slice()
            && self.message == message
            && self.signature == signature.as_slice()
    }
}

/// Parse Ed25519 program instruction data holding exactly one signature.
///
/// Every offset must point into this same instruction. The native program
/// verifies whatever the offsets reference, so data pulled from another
/// instruction would not be the data that was checked.
pub fn parse_ed25519_instruction(data: &[u8]) -> Result<Ed25519Payload<'_>> {
    require!(
        data.len() >= NUM_SIGNATURES_LEN + OFFSETS_LEN && data[0] == 1,
        ErrorCode::SignatureVerificationFailed
    );

    let at = NUM_SIGNATURES_LEN;
    let signature_offset = read_u16(data, at)?;
    let signature_ix = read_u16(data, at + 2)?;
    let public_key_offset = read_u16(data, at + 4)?;
    let public_key_ix = read_u16(data, at + 6)?;
    let message_offset = read_u16(data, at + 8)?;
    let message_size = read_u16(data, at + 10)?;
    let message_ix = read_u16(data, at + 12)?;

    require!(
        signature_ix == THIS_INSTRUCTION
            && public_key_ix == THIS_INSTRUCTION
            && message_ix == THIS_INSTRUCTION,
        ErrorCode::SignatureVerificationFailed
    );

    Ok(Ed25519Payload {
        public_key: read_slice(data, public_key_offset, PUBKEY_LEN)?,
        signature: read_slice(data, signature_offset, SIGNATURE_LEN)?,
        message: read_slice(data, message_offset, message_size as usize)?,
    })
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    let bytes = data
        .get(at..at + 2)
        .ok_or(ErrorCode::SignatureVerificationFailed)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_slice(data: &[u8], offset: u16, len: usize) -> Result<&[u8]> {
    let start = offset as usize;
    let slice = data
        .get(start..start + len)
        .ok_or(ErrorCode::SignatureVerificationFailed)?;
    Ok(slice)
}

/// Checks for a companion Ed25519 verification instruction earlier in the
/// same transaction. The runtime has already verified it by the time this
/// program runs; the oracle only binds it to the expected signer, message
/// and signature.
pub struct InstructionSysvarOracle<'a, 'info> {
    instructions: &'a AccountInfo<'info>,
}

impl<'a, 'info> InstructionSysvarOracle<'a, 'info> {
    pub fn new(instructions: &'a AccountInfo<'info>) -> Self {
        Self { instructions }
    }
}

impl SignatureOracle for InstructionSysvarOracle<'_, '_> {
    fn verify(&self, signer: &Pubkey, message: &[u8], signature: &[u8; 64]) -> Result<()> {
        let current = load_current_index_checked(self.instructions)?;

        let mut found = false;
        for idx in 0..current {
            let ix = load_instruction_at_checked(idx as usize, self.instructions)?;
            if ix.program_id != ed25519_program::ID {
                continue;
            }
            found = true;

            match parse_ed25519_instruction(&ix.data) {
                Ok(payload) if payload.matches(signer, message, signature) => {
                    return Ok(());
                }
                Ok(_) => msg!("Ed25519 instruction {} does not match bet", idx),
                Err(_) => msg!("Ed25519 instruction {} is malformed", idx),
            }
        }

        require!(found, ErrorCode::MissingVerificationInstruction);
        err!(ErrorCode::SignatureVerificationFailed)
    }
}
