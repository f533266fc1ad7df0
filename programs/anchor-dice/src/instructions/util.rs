use anchor_lang::prelude::*;
use solana_program::keccak;

use super::constant::*;
use super::errors::ErrorCode;
use super::models::{Outcome, Settlement};

pub fn check_roll_threshold(roll: u8) -> Result<()> {
    require!(
        (MIN_ROLL..=MAX_ROLL).contains(&roll),
        ErrorCode::InvalidRollThreshold
    );
    Ok(())
}

/// Roll in `[0, ROLL_MODULUS)` derived from the house signature.
///
/// keccak256(signature) split into two little-endian u128 halves, added
/// with wrap-around, reduced modulo 100. This mapping is part of the
/// protocol: clients predicting outcomes must reproduce it exactly.
pub fn roll_from_signature(signature: &[u8; 64]) -> u8 {
    let hash = keccak::hash(signature).to_bytes();

    let mut lower = [0u8; 16];
    let mut upper = [0u8; 16];
    lower.copy_from_slice(&hash[..16]);
    upper.copy_from_slice(&hash[16..]);

    let mixed = u128::from_le_bytes(lower).wrapping_add(u128::from_le_bytes(upper));
    (mixed % ROLL_MODULUS as u128) as u8
}

// u64 * 100 always fits in u128.
fn wide_payout(amount: u64, roll: u8) -> u128 {
    amount as u128 * ROLL_MODULUS as u128 / roll as u128
}

/// Total paid to the player on a win: `floor(amount * 100 / roll)`.
pub fn payout_for(amount: u64, roll: u8) -> Result<u64> {
    check_roll_threshold(roll)?;

    let payout = u64::try_from(wide_payout(amount, roll)).map_err(|_| ErrorCode::Overflow)?;
    Ok(payout)
}

/// What the vault itself owes if the bet wins; the wager is already escrowed.
pub fn vault_exposure(amount: u64, roll: u8) -> Result<u64> {
    let payout = payout_for(amount, roll)?;
    let exposure = payout.checked_sub(amount).ok_or(ErrorCode::Overflow)?;
    Ok(exposure)
}

/// Stake not pledged to open bets and not needed for rent exemption.
pub fn available_stake(lamports: u64, rent_exempt_minimum: u64, reserved: u64) -> u64 {
    lamports
        .saturating_sub(rent_exempt_minimum)
        .saturating_sub(reserved)
}

pub fn max_wager(available: u64) -> u64 {
    let limit = available as u128 * MAX_WAGER_BPS as u128 / BPS_DENOMINATOR as u128;
    limit as u64
}

/// Check a new bet against the vault's free stake.
///
/// The payout is compared at full width, so a payout too large for u64
/// reports `VaultUnderfunded` like any other uncoverable bet.
pub fn check_vault_capacity(available: u64, amount: u64, roll: u8) -> Result<u64> {
    check_roll_threshold(roll)?;

    let payout = wide_payout(amount, roll);
    require!(payout <= available as u128, ErrorCode::VaultUnderfunded);
    require!(amount <= max_wager(available), ErrorCode::WagerExceedsLimit);

    let payout = u64::try_from(payout).map_err(|_| ErrorCode::Overflow)?;
    Ok(payout)
}

/// Lamports a new program account needs: rent exemption for `space` plus `amount`.
pub fn account_funding(rent: &Rent, space: usize, amount: u64) -> Result<u64> {
    let lamports = rent
        .minimum_balance(space)
        .checked_add(amount)
        .ok_or(ErrorCode::Overflow)?;
    Ok(lamports)
}

/// True while `info` is a plain system account with no data.
pub fn is_unallocated(info: &AccountInfo) -> bool {
    info.data_is_empty() && info.owner == &System::id()
}

/// Debit `from` and credit `to` directly. `from` must be owned by this program.
pub fn move_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let from_balance = from
        .lamports()
        .checked_sub(amount)
        .ok_or(ErrorCode::VaultUnderfunded)?;
    let to_balance = to.lamports().checked_add(amount).ok_or(ErrorCode::Overflow)?;

    **from.try_borrow_mut_lamports()? = from_balance;
    **to.try_borrow_mut_lamports()? = to_balance;

    Ok(())
}

pub fn settle(signature: &[u8; 64], threshold: u8, amount: u64) -> Result<Settlement> {
    let roll = roll_from_signature(signature);

    if roll < threshold {
        let payout = payout_for(amount, threshold)?;
        Ok(Settlement {
            outcome: Outcome::Win,
            roll,
            payout,
            vault_debit: payout.checked_sub(amount).ok_or(ErrorCode::Overflow)?,
            vault_credit: 0,
        })
    } else {
        Ok(Settlement {
            outcome: Outcome::Lose,
            roll,
            payout: 0,
            vault_debit: 0,
            vault_credit: amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

    fn find_signature(pred: impl Fn(u8) -> bool) -> [u8; 64] {
        (0u8..=255)
            .map(|b| [b; 64])
            .find(|sig| pred(roll_from_signature(sig)))
            .unwrap()
    }

    #[test]
    fn threshold_bounds() {
        assert!(check_roll_threshold(0).is_err());
        assert!(check_roll_threshold(1).is_ok());
        assert!(check_roll_threshold(99).is_ok());
        assert!(check_roll_threshold(100).is_err());
    }

    #[test]
    fn roll_is_deterministic_and_in_range() {
        for b in 0u8..=255 {
            let mut sig = [0u8; 64];
            sig[0] = b;
            sig[63] = b.wrapping_mul(31);
            let roll = roll_from_signature(&sig);
            assert!(roll < ROLL_MODULUS);
            assert_eq!(roll, roll_from_signature(&sig));
        }
    }

    #[test]
    fn roll_depends_on_every_byte() {
        let base = [3u8; 64];
        let rolls: std::collections::HashSet<u8> = (0..64)
            .map(|i| {
                let mut sig = base;
                sig[i] ^= 0xff;
                roll_from_signature(&sig)
            })
            .collect();
        // 64 independent hashes into 100 buckets never collapse to a handful.
        assert!(rolls.len() > 20);
    }

    #[test]
    fn payout_is_floored() {
        assert_eq!(payout_for(LAMPORTS_PER_SOL / 100, 40).unwrap(), 25_000_000);
        assert_eq!(payout_for(10, 3).unwrap(), 333);
        assert_eq!(payout_for(1, 99).unwrap(), 1);
        assert_eq!(payout_for(7, 1).unwrap(), 700);
    }

    #[test]
    fn payout_overflow_is_reported() {
        let err = payout_for(u64::MAX, 1).unwrap_err();
        assert_eq!(err, ErrorCode::Overflow.into());
        assert!(payout_for(u64::MAX, 99).is_err());
        assert_eq!(payout_for(u64::MAX / 100, 1).unwrap(), u64::MAX / 100 * 100);
    }

    #[test]
    fn exposure_excludes_escrowed_wager() {
        assert_eq!(vault_exposure(10_000_000, 40).unwrap(), 15_000_000);
        assert_eq!(vault_exposure(100, 99).unwrap(), 1);
    }

    #[test]
    fn available_stake_saturates() {
        assert_eq!(available_stake(1_000, 100, 200), 700);
        assert_eq!(available_stake(100, 200, 0), 0);
        assert_eq!(available_stake(1_000, 100, 5_000), 0);
    }

    #[test]
    fn capacity_checks_payout_before_wager_limit() {
        let available = 4 * LAMPORTS_PER_SOL;

        // 1 SOL at 20% pays 5 SOL, more than the vault holds.
        let err = check_vault_capacity(available, LAMPORTS_PER_SOL, 20).unwrap_err();
        assert_eq!(err, ErrorCode::VaultUnderfunded.into());

        // 1 SOL at 99% pays ~1.01 SOL but breaks the 10% wager limit.
        let err = check_vault_capacity(available, LAMPORTS_PER_SOL, 99).unwrap_err();
        assert_eq!(err, ErrorCode::WagerExceedsLimit.into());

        let payout = check_vault_capacity(available, LAMPORTS_PER_SOL / 100, 40).unwrap();
        assert_eq!(payout, 25_000_000);
    }

    #[test]
    fn capacity_rejects_payout_beyond_u64_as_underfunded() {
        let err = check_vault_capacity(4 * LAMPORTS_PER_SOL, u64::MAX / 2, 1).unwrap_err();
        assert_eq!(err, ErrorCode::VaultUnderfunded.into());

        let err = check_vault_capacity(u64::MAX, u64::MAX, 1).unwrap_err();
        assert_eq!(err, ErrorCode::VaultUnderfunded.into());
    }

    #[test]
    fn capacity_rejects_invalid_threshold() {
        let err = check_vault_capacity(LAMPORTS_PER_SOL, 1_000, 0).unwrap_err();
        assert_eq!(err, ErrorCode::InvalidRollThreshold.into());
    }

    #[test]
    fn funding_covers_rent_and_amount() {
        let rent = Rent::default();
        let lamports = account_funding(&rent, 64, 500).unwrap();
        assert_eq!(lamports, rent.minimum_balance(64) + 500);

        let err = account_funding(&rent, 64, u64::MAX).unwrap_err();
        assert_eq!(err, ErrorCode::Overflow.into());
    }

    #[test]
    fn unallocated_means_empty_system_account() {
        let key = Pubkey::new_unique();
        let system = System::id();
        let program = crate::ID;

        let (mut lamports, mut empty) = (1_000u64, [0u8; 0]);
        let funded = AccountInfo::new(&key, false, true, &mut lamports, &mut empty, &system, false, 0);
        assert!(is_unallocated(&funded));

        let (mut lamports, mut empty) = (1_000u64, [0u8; 0]);
        let owned = AccountInfo::new(&key, false, true, &mut lamports, &mut empty, &program, false, 0);
        assert!(!is_unallocated(&owned));

        let (mut lamports, mut data) = (1_000u64, [0u8; 8]);
        let with_data = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &system, false, 0);
        assert!(!is_unallocated(&with_data));
    }

    #[test]
    fn move_lamports_is_all_or_nothing() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let owner = crate::ID;
        let (mut a_lamports, mut b_lamports) = (1_000u64, 10u64);
        let (mut a_data, mut b_data) = ([0u8; 0], [0u8; 0]);
        let from = AccountInfo::new(&a, false, true, &mut a_lamports, &mut a_data, &owner, false, 0);
        let to = AccountInfo::new(&b, false, true, &mut b_lamports, &mut b_data, &owner, false, 0);

        move_lamports(&from, &to, 400).unwrap();
        assert_eq!((from.lamports(), to.lamports()), (600, 410));

        let err = move_lamports(&from, &to, 601).unwrap_err();
        assert_eq!(err, ErrorCode::VaultUnderfunded.into());
        assert_eq!((from.lamports(), to.lamports()), (600, 410));

        move_lamports(&from, &to, 0).unwrap();
        assert_eq!((from.lamports(), to.lamports()), (600, 410));
    }

    #[test]
    fn settle_win_moves_payout_minus_wager_from_vault() {
        let sig = find_signature(|roll| roll < 40);
        let s = settle(&sig, 40, 10_000_000).unwrap();

        assert_eq!(s.outcome, Outcome::Win);
        assert!(s.roll < 40);
        assert_eq!(s.payout, 25_000_000);
        assert_eq!(s.vault_debit, 15_000_000);
        assert_eq!(s.vault_credit, 0);
    }

    #[test]
    fn settle_lose_credits_wager_to_vault() {
        let sig = find_signature(|roll| roll >= 40);
        let s = settle(&sig, 40, 10_000_000).unwrap();

        assert_eq!(s.outcome, Outcome::Lose);
        assert!(s.roll >= 40);
        assert_eq!(s.payout, 0);
        assert_eq!(s.vault_debit, 0);
        assert_eq!(s.vault_credit, 10_000_000);
    }

    #[test]
    fn roll_equal_to_threshold_loses() {
        let sig = find_signature(|roll| roll > 0 && roll < MAX_ROLL);
        let roll = roll_from_signature(&sig);

        assert_eq!(settle(&sig, roll, 1_000).unwrap().outcome, Outcome::Lose);
        assert_eq!(settle(&sig, roll + 1, 1_000).unwrap().outcome, Outcome::Win);
    }
}
