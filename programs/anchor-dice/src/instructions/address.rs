use anchor_lang::prelude::*;

use super::constant::*;
use super::errors::ErrorCode;

/// Derive the program address for `tag` followed by `seeds`.
///
/// Both clients and the program must produce identical results, so the
/// layout is always `[tag, seeds..]` with the bump found by the runtime's
/// bounded search.
pub fn derive_address(tag: &[u8], seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    let mut all_seeds: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
    all_seeds.push(tag);
    all_seeds.extend_from_slice(seeds);

    let found = Pubkey::try_find_program_address(&all_seeds, program_id)
        .ok_or(ErrorCode::AddressSpaceExhausted)?;
    Ok(found)
}

pub fn vault_address(house: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive_address(VAULT_SEED, &[house.as_ref()], program_id)
}

pub fn bet_address(vault: &Pubkey, seed: u128, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive_address(BET_SEED, &[vault.as_ref(), &seed.to_le_bytes()], program_id)
}

/// Re-derive with a stored bump and require the result to be `expected`.
pub fn check_address(
    tag: &[u8],
    seeds: &[&[u8]],
    bump: u8,
    expected: &Pubkey,
    program_id: &Pubkey,
) -> Result<()> {
    let bump_seed = [bump];
    let mut all_seeds: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 2);
    all_seeds.push(tag);
    all_seeds.extend_from_slice(seeds);
    all_seeds.push(&bump_seed);

    let derived = Pubkey::create_program_address(&all_seeds, program_id)
        .map_err(|_| ErrorCode::AccountMismatch)?;
    require_keys_eq!(derived, *expected, ErrorCode::AccountMismatch);

    Ok(())
}
