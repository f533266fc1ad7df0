use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Win,
    Lose,
}

/// Lamport movements produced by resolving one bet.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Settlement {
    pub outcome: Outcome,
    pub roll: u8,
    pub payout: u64,       // total credited to the player on a win, 0 on a loss
    pub vault_debit: u64,  // vault -> player
    pub vault_credit: u64, // bet escrow -> vault
}

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub house: Pubkey,
    pub deposit: u64,
}

#[event]
pub struct BetPlaced {
    pub bet: Pubkey,
    pub player: Pubkey,
    pub vault: Pubkey,
    pub seed: u128,
    pub roll: u8,
    pub amount: u64,
    pub max_payout: u64,
}

#[event]
pub struct BetResolved {
    pub bet: Pubkey,
    pub player: Pubkey,
    pub vault: Pubkey,
    pub roll: u8,
    pub threshold: u8,
    pub outcome: Outcome,
    pub payout: u64,
}
