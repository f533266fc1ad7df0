use anchor_lang::prelude::*;

use super::errors::ErrorCode;

#[account]
#[derive(InitSpace)]
pub struct Vault {
    pub house: Pubkey,
    pub reserved: u64, // net payout owed to open bets if they all win
    pub bump: u8,
}

impl Vault {
    pub fn reserve(&mut self, exposure: u64) -> Result<()> {
        self.reserved = self
            .reserved
            .checked_add(exposure)
            .ok_or(ErrorCode::Overflow)?;
        Ok(())
    }

    pub fn release(&mut self, exposure: u64) -> Result<()> {
        self.reserved = self
            .reserved
            .checked_sub(exposure)
            .ok_or(ErrorCode::Overflow)?;
        Ok(())
    }
}

/// A single open wager. Field order is the message the house signs, so
/// changing it breaks every client that produces resolve signatures.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Bet {
    pub player: Pubkey,
    pub vault: Pubkey,
    pub seed: u128,
    pub roll: u8, // win threshold in percent
    pub amount: u64,
    pub slot: u64,
    pub bump: u8,
}

impl Bet {
    /// Serialized length of the signed message (discriminator excluded).
    pub const MESSAGE_LEN: usize = Bet::INIT_SPACE;
}
