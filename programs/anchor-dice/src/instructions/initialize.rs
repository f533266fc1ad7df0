use anchor_lang::prelude::*;
use anchor_lang::system_program::{create_account, CreateAccount};

use super::accounts::*;
use super::constant::*;
use super::errors::ErrorCode;
use super::models::VaultInitialized;
use super::util::{account_funding, is_unallocated};

pub fn initialize(ctx: Context<Initialize>, deposit: u64) -> Result<()> {
    require!(deposit > 0, ErrorCode::InvalidAmount);

    let vault_info = ctx.accounts.vault.to_account_info();
    if !is_unallocated(&vault_info) {
        return Err(ProgramError::AccountAlreadyInitialized.into());
    }

    // Vault rent and the deposit come from the house in a single creation.
    let space = DISCRIMINATOR_LEN + Vault::INIT_SPACE;
    let lamports = account_funding(&Rent::get()?, space, deposit)?;
    require!(
        ctx.accounts.house.lamports() >= lamports,
        ErrorCode::InsufficientFunds
    );

    let house_key = ctx.accounts.house.key();
    let vault_bump = ctx.bumps.vault;
    let vault_signer_seeds: &[&[u8]] = &[VAULT_SEED, house_key.as_ref(), &[vault_bump]];

    create_account(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            CreateAccount {
                from: ctx.accounts.house.to_account_info(),
                to: vault_info.clone(),
            },
            &[vault_signer_seeds],
        ),
        lamports,
        space as u64,
        ctx.program_id,
    )?;

    let vault = Vault {
        house: house_key,
        reserved: 0,
        bump: vault_bump,
    };
    {
        let mut data = vault_info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        vault.try_serialize(&mut writer)?;
    }

    msg!(
        "Vault initialized: vault={}, house={}, deposit={}, vault_balance={}",
        vault_info.key(),
        house_key,
        deposit,
        vault_info.lamports()
    );

    emit!(VaultInitialized {
        vault: vault_info.key(),
        house: house_key,
        deposit,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub house: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, house.key().as_ref()],
        bump
    )]
    /// CHECK: Vault PDA verified by seeds, created in the handler
    pub vault: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
