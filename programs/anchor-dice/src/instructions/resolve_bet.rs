use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions as instructions_sysvar;

use super::accounts::*;
use super::address::check_address;
use super::constant::*;
use super::errors::ErrorCode;
use super::models::{BetResolved, Outcome};
use super::oracle::{InstructionSysvarOracle, SignatureOracle};
use super::util::{move_lamports, settle, vault_exposure};

pub fn resolve_bet(ctx: Context<ResolveBet>, sig: [u8; 64]) -> Result<()> {
    let house_key = ctx.accounts.house.key();
    let vault_key = ctx.accounts.vault.key();
    let bet_key = ctx.accounts.bet.key();
    let player_key = ctx.accounts.player.key();

    let threshold = ctx.accounts.bet.roll;
    let amount = ctx.accounts.bet.amount;

    // Re-derive both PDAs so a look-alike vault or bet cannot be swapped in.
    check_address(
        VAULT_SEED,
        &[house_key.as_ref()],
        ctx.accounts.vault.bump,
        &vault_key,
        ctx.program_id,
    )?;
    check_address(
        BET_SEED,
        &[vault_key.as_ref(), &ctx.accounts.bet.seed.to_le_bytes()],
        ctx.accounts.bet.bump,
        &bet_key,
        ctx.program_id,
    )?;

    // The house signature over the committed bet bytes must be verified
    // before any lamports move.
    let bet_info = ctx.accounts.bet.to_account_info();
    {
        let data = bet_info.try_borrow_data()?;
        let message = data
            .get(DISCRIMINATOR_LEN..)
            .ok_or(ErrorCode::AccountMismatch)?;
        InstructionSysvarOracle::new(&ctx.accounts.instruction_sysvar).verify(
            &house_key,
            message,
            &sig,
        )?;
    }

    let settlement = settle(&sig, threshold, amount)?;
    let vault_info = ctx.accounts.vault.to_account_info();
    let player_info = ctx.accounts.player.to_account_info();

    match settlement.outcome {
        Outcome::Win => {
            // The escrowed wager reaches the player when the bet is closed.
            move_lamports(&vault_info, &player_info, settlement.vault_debit)?;
        }
        Outcome::Lose => {
            move_lamports(&bet_info, &vault_info, settlement.vault_credit)?;
        }
    }

    let vault = &mut ctx.accounts.vault;
    vault.release(vault_exposure(amount, threshold)?)?;

    msg!(
        "Bet resolved: bet={}, player={}, roll={}, threshold={}, outcome={:?}, payout={}, vault_balance={}",
        bet_key,
        player_key,
        settlement.roll,
        threshold,
        settlement.outcome,
        settlement.payout,
        vault_info.lamports()
    );

    emit!(BetResolved {
        bet: bet_key,
        player: player_key,
        vault: vault_key,
        roll: settlement.roll,
        threshold,
        outcome: settlement.outcome,
        payout: settlement.payout,
    });

    // Bet account is closed to the player on exit.
    Ok(())
}

#[derive(Accounts)]
pub struct ResolveBet<'info> {
    #[account(mut)]
    pub house: Signer<'info>,

    /// CHECK: Player verified against the bet record
    #[account(mut)]
    pub player: UncheckedAccount<'info>,

    #[account(
        mut,
        has_one = house @ ErrorCode::AccountMismatch
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        close = player,
        has_one = player @ ErrorCode::AccountMismatch,
        has_one = vault @ ErrorCode::AccountMismatch
    )]
    pub bet: Account<'info, Bet>,

    #[account(address = instructions_sysvar::ID)]
    /// CHECK: Instructions sysvar verified by address
    pub instruction_sysvar: AccountInfo<'info>,

    pub system_program: Program<'info, System>,
}
