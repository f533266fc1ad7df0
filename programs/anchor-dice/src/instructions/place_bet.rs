use anchor_lang::prelude::*;
use anchor_lang::system_program::{create_account, CreateAccount};

use super::accounts::*;
use super::constant::*;
use super::errors::ErrorCode;
use super::models::BetPlaced;
use super::util::{
    account_funding, available_stake, check_roll_threshold, check_vault_capacity, is_unallocated,
};

pub fn place_bet(ctx: Context<PlaceBet>, seed: u128, roll: u8, amount: u64) -> Result<()> {
    check_roll_threshold(roll)?;
    require!(amount > 0, ErrorCode::InvalidAmount);

    // An open bet with the same (vault, seed) still owns this address.
    let bet_info = ctx.accounts.bet.to_account_info();
    require!(is_unallocated(&bet_info), ErrorCode::DuplicateBet);

    // Capacity is read from the vault inside this transaction, so bets
    // placed earlier are already part of `reserved`.
    let rent = Rent::get()?;
    let vault_info = ctx.accounts.vault.to_account_info();
    let available = available_stake(
        vault_info.lamports(),
        rent.minimum_balance(vault_info.data_len()),
        ctx.accounts.vault.reserved,
    );
    let max_payout = check_vault_capacity(available, amount, roll)?;
    let exposure = max_payout
        .checked_sub(amount)
        .ok_or(ErrorCode::Overflow)?;

    // Create the bet account holding rent plus the escrowed wager.
    let vault_key = ctx.accounts.vault.key();
    let seed_bytes = seed.to_le_bytes();
    let bet_bump = ctx.bumps.bet;
    let bet_signer_seeds: &[&[u8]] = &[BET_SEED, vault_key.as_ref(), &seed_bytes, &[bet_bump]];

    let space = DISCRIMINATOR_LEN + Bet::INIT_SPACE;
    let lamports = account_funding(&rent, space, amount)?;

    create_account(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            CreateAccount {
                from: ctx.accounts.player.to_account_info(),
                to: bet_info.clone(),
            },
            &[bet_signer_seeds],
        ),
        lamports,
        space as u64,
        ctx.program_id,
    )?;

    let record = Bet {
        player: ctx.accounts.player.key(),
        vault: vault_key,
        seed,
        roll,
        amount,
        slot: Clock::get()?.slot,
        bump: bet_bump,
    };
    {
        let mut data = bet_info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        record.try_serialize(&mut writer)?;
    }

    let vault = &mut ctx.accounts.vault;
    vault.reserve(exposure)?;

    msg!(
        "Bet placed: bet={}, player={}, vault={}, seed={}, roll={}, amount={}, max_payout={}, reserved={}",
        bet_info.key(),
        record.player,
        vault_key,
        seed,
        roll,
        amount,
        max_payout,
        vault.reserved
    );

    emit!(BetPlaced {
        bet: bet_info.key(),
        player: record.player,
        vault: vault_key,
        seed,
        roll,
        amount,
        max_payout,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(seed: u128)]
pub struct PlaceBet<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    /// CHECK: Only used to derive the vault address
    pub house: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, house.key().as_ref()],
        bump = vault.bump,
        has_one = house @ ErrorCode::AccountMismatch
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [BET_SEED, vault.key().as_ref(), &seed.to_le_bytes()],
        bump
    )]
    /// CHECK: Bet PDA verified by seeds, created in the handler
    pub bet: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
