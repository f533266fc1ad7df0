pub mod accounts;
pub mod initialize;
pub mod place_bet;
pub mod resolve_bet;

pub mod address;
pub mod models;
pub mod oracle;
pub mod util;

pub use accounts::*;
pub use initialize::*;
pub use models::*;
pub use place_bet::*;
pub use resolve_bet::*;

pub mod constant {
    pub const VAULT_SEED: &[u8] = b"vault";
    pub const BET_SEED: &[u8] = b"bet";

    /// Anchor account discriminator, excluded from the signed bet message.
    pub const DISCRIMINATOR_LEN: usize = 8;

    pub const MIN_ROLL: u8 = 1;
    pub const MAX_ROLL: u8 = 99;
    pub const ROLL_MODULUS: u8 = 100;

    /// Largest single wager as a share of the vault's free stake.
    pub const MAX_WAGER_BPS: u64 = 1_000; // 10%
    pub const BPS_DENOMINATOR: u64 = 10_000;
}

pub mod errors {
    use anchor_lang::prelude::*;

    #[error_code]
    pub enum ErrorCode {
        #[msg("Roll threshold must be between 1 and 99")]
        InvalidRollThreshold,
        #[msg("Invalid amount (must be > 0)")]
        InvalidAmount,
        #[msg("House cannot cover the deposit")]
        InsufficientFunds,
        #[msg("Vault cannot cover the potential payout")]
        VaultUnderfunded,
        #[msg("Wager exceeds the per-bet limit of the vault")]
        WagerExceedsLimit,
        #[msg("A bet with this seed is already open")]
        DuplicateBet,
        #[msg("Ed25519 signature does not match house, bet or signature")]
        SignatureVerificationFailed,
        #[msg("No Ed25519 verification instruction in transaction")]
        MissingVerificationInstruction,
        #[msg("Supplied account does not match its derived address")]
        AccountMismatch,
        #[msg("No valid bump for program derived address")]
        AddressSpaceExhausted,
        #[msg("Arithmetic overflow")]
        Overflow,
    }
}
