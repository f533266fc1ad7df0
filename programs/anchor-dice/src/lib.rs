use anchor_lang::prelude::*;

pub mod instructions;

declare_id!("Dice9vQn3bV4XkR1uJzgq8hW2yTtmfLPcE6sUoNd7aKx");

#[program]
pub mod anchor_dice {
    use super::*;
    pub use instructions::*;

    pub fn initialize(ctx: Context<Initialize>, deposit: u64) -> Result<()> {
        instructions::initialize(ctx, deposit)
    }

    pub fn place_bet(ctx: Context<PlaceBet>, seed: u128, roll: u8, amount: u64) -> Result<()> {
        instructions::place_bet(ctx, seed, roll, amount)
    }

    pub fn resolve_bet(ctx: Context<ResolveBet>, sig: [u8; 64]) -> Result<()> {
        instructions::resolve_bet(ctx, sig)
    }
}
