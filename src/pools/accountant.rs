//! Liquidity Accountant: shares minted on join, amounts returned on exit.
//!
//! | Join shape | Shares |
//! |------------|--------|
//! | bootstrap (no shares yet) | invariant of the deposit |
//! | balanced (every asset) | `min_i floor(a_i × T / r_i)` |
//! | single asset | `floor(T × (ratio − 1))`, `ratio` the invariant growth after fees |
//!
//! Balanced joins take `ceil(r_i × shares / T)` of each asset and refund
//! the rest, so backing per share never falls.  Single-asset joins pay the
//! swap fee on the part of the deposit above its proportional share, so
//! invariant per share never falls either.  Exits pay
//! `floor(r_i × shares / T)`.

use crate::domain::{Amount, ExitQuote, FeeRate, JoinQuote, Rounding, Shares};
use crate::error::{AmmError, Result};
use crate::math::{CheckedArithmetic, WAD, mul_div};
use crate::traits::InvariantEvaluator;

/// Prices a join against the current reserves and supply.
///
/// # Errors
///
/// - [`AmmError::LengthMismatch`] if `amounts_in` does not cover every
///   asset.
/// - [`AmmError::InvalidQuantity`] for an all-zero deposit, a deposit that
///   is neither balanced nor single-asset, or one too small to mint a
///   share.
/// - [`AmmError::InsufficientLiquidity`] if shares exist but a reserve is
///   empty.
/// - Arithmetic errors from the evaluator.
pub fn compute_shares_for_join<E: InvariantEvaluator + ?Sized>(
    eval: &E,
    fee: FeeRate,
    reserves: &[Amount],
    total_shares: Shares,
    amounts_in: &[Amount],
) -> Result<JoinQuote> {
    let n = eval.asset_count();
    if reserves.len() != n || amounts_in.len() != n {
        return Err(AmmError::LengthMismatch("join amounts do not match the pool's assets"));
    }
    let supplied: Vec<usize> = (0..n)
        .filter(|&k| amounts_in.get(k).is_some_and(|a| !a.is_zero()))
        .collect();
    if supplied.is_empty() {
        return Err(AmmError::InvalidQuantity("join deposit is empty"));
    }

    if total_shares.is_zero() {
        let shares = eval.bootstrap_shares(amounts_in)?;
        return Ok(JoinQuote {
            shares,
            amounts_used: amounts_in.to_vec(),
            refunds: vec![Amount::ZERO; n],
            fees: vec![Amount::ZERO; n],
        });
    }
    if reserves.iter().any(Amount::is_zero) {
        return Err(AmmError::InsufficientLiquidity);
    }

    match supplied.as_slice() {
        [k] if n > 1 => single_asset_join(eval, fee, reserves, total_shares, amounts_in, *k),
        s if s.len() == n => balanced_join(reserves, total_shares, amounts_in),
        _ => Err(AmmError::InvalidQuantity("join must supply every asset or exactly one")),
    }
}

fn balanced_join(reserves: &[Amount], total: Shares, amounts_in: &[Amount]) -> Result<JoinQuote> {
    let t = total.get();
    let mut shares = u128::MAX;
    for (a, r) in amounts_in.iter().zip(reserves) {
        shares = shares.min(mul_div(a.get(), t, r.get(), Rounding::Down)?);
    }
    if shares == 0 {
        return Err(AmmError::InvalidQuantity("deposit too small to mint a share"));
    }

    let mut amounts_used = Vec::with_capacity(reserves.len());
    let mut refunds = Vec::with_capacity(reserves.len());
    for (a, r) in amounts_in.iter().zip(reserves) {
        let used = r.safe_mul_div(shares, t, Rounding::Up)?;
        // shares <= a × T / r, so used <= a.
        refunds.push(a.safe_sub(&used)?);
        amounts_used.push(used);
    }
    Ok(JoinQuote {
        shares: Shares::new(shares),
        amounts_used,
        refunds,
        fees: vec![Amount::ZERO; reserves.len()],
    })
}

fn single_asset_join<E: InvariantEvaluator + ?Sized>(
    eval: &E,
    fee: FeeRate,
    reserves: &[Amount],
    total: Shares,
    amounts_in: &[Amount],
    k: usize,
) -> Result<JoinQuote> {
    let amount = amounts_in
        .get(k)
        .copied()
        .ok_or(AmmError::InvalidAsset("asset index out of range"))?;
    let reserve_k = reserves
        .get(k)
        .copied()
        .ok_or(AmmError::InvalidAsset("asset index out of range"))?;

    // A balanced deposit growing the invariant as much would contain
    // r_k × (ratio − 1) of asset k; the rest is effectively swapped.
    let gross_ratio = eval.invariant_ratio(reserves, &with_added(reserves, k, amount)?)?;
    let proportional = reserve_k
        .safe_mul_div(gross_ratio.saturating_sub(WAD), WAD, Rounding::Down)?
        .min(amount);
    let taxable = amount.safe_sub(&proportional)?;
    let fee_amount = fee.fee_on(taxable)?;
    let net = amount.safe_sub(&fee_amount)?;

    let ratio = eval.invariant_ratio(reserves, &with_added(reserves, k, net)?)?;
    let shares = total.safe_mul_div(ratio.saturating_sub(WAD), WAD, Rounding::Down)?;
    if shares.is_zero() {
        return Err(AmmError::InvalidQuantity("deposit too small to mint a share"));
    }

    let n = reserves.len();
    let mut fees = vec![Amount::ZERO; n];
    if let Some(slot) = fees.get_mut(k) {
        *slot = fee_amount;
    }
    Ok(JoinQuote {
        shares,
        amounts_used: amounts_in.to_vec(),
        refunds: vec![Amount::ZERO; n],
        fees,
    })
}

fn with_added(reserves: &[Amount], k: usize, amount: Amount) -> Result<Vec<Amount>> {
    let mut after = reserves.to_vec();
    let slot = after
        .get_mut(k)
        .ok_or(AmmError::InvalidAsset("asset index out of range"))?;
    *slot = slot.safe_add(&amount)?;
    Ok(after)
}

/// Prices an exit: `floor(r_i × shares / T)` of every asset.
///
/// # Errors
///
/// - [`AmmError::EmptyPool`] if no shares are outstanding.
/// - [`AmmError::InvalidQuantity`] for zero shares.
/// - [`AmmError::InsufficientShares`] if `shares` exceeds the supply.
pub fn compute_amounts_for_exit(reserves: &[Amount], total_shares: Shares, shares: Shares) -> Result<ExitQuote> {
    if total_shares.is_zero() {
        return Err(AmmError::EmptyPool);
    }
    if shares.is_zero() {
        return Err(AmmError::InvalidQuantity("exit must burn shares"));
    }
    if shares > total_shares {
        return Err(AmmError::InsufficientShares);
    }
    let amounts_out = reserves
        .iter()
        .map(|r| r.safe_mul_div(shares.get(), total_shares.get(), Rounding::Down))
        .collect::<Result<Vec<_>>>()?;
    Ok(ExitQuote { shares, amounts_out })
}

#[cfg(all(test, feature = "weighted"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Weight;
    use crate::pools::WeightedInvariant;

    fn pair() -> WeightedInvariant {
        let Ok(w) = Weight::equal(2) else {
            panic!("weights");
        };
        let Ok(inv) = WeightedInvariant::new(w) else {
            panic!("invariant");
        };
        inv
    }

    fn amounts(v: &[u128]) -> Vec<Amount> {
        v.iter().map(|x| Amount::new(*x)).collect()
    }

    fn fee(bps: u32) -> FeeRate {
        let Ok(f) = FeeRate::new(bps) else {
            panic!("fee");
        };
        f
    }

    // -- join ---------------------------------------------------------------

    #[test]
    fn bootstrap_mints_invariant() {
        let Ok(q) = compute_shares_for_join(&pair(), fee(30), &amounts(&[0, 0]), Shares::ZERO, &amounts(&[1_000, 1_000]))
        else {
            panic!("join");
        };
        assert_eq!(q.shares, Shares::new(1_000));
        assert_eq!(q.amounts_used, amounts(&[1_000, 1_000]));
        assert_eq!(q.refunds, amounts(&[0, 0]));
    }

    #[test]
    fn bootstrap_needs_every_asset() {
        assert!(matches!(
            compute_shares_for_join(&pair(), fee(30), &amounts(&[0, 0]), Shares::ZERO, &amounts(&[1_000, 0])),
            Err(AmmError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn balanced_join_refunds_excess() {
        let Ok(q) = compute_shares_for_join(
            &pair(),
            fee(30),
            &amounts(&[1_000, 2_000]),
            Shares::new(1_000),
            &amounts(&[100, 500]),
        ) else {
            panic!("join");
        };
        assert_eq!(q.shares, Shares::new(100));
        assert_eq!(q.amounts_used, amounts(&[100, 200]));
        assert_eq!(q.refunds, amounts(&[0, 300]));
        assert_eq!(q.fees, amounts(&[0, 0]));
    }

    #[test]
    fn balanced_join_rounds_usage_up() {
        let Ok(q) = compute_shares_for_join(
            &pair(),
            FeeRate::ZERO,
            &amounts(&[1_001, 3_000]),
            Shares::new(1_000),
            &amounts(&[10, 100]),
        ) else {
            panic!("join");
        };
        // min(10 × 1000 / 1001, 100 × 1000 / 3000) = min(9, 33)
        assert_eq!(q.shares, Shares::new(9));
        assert_eq!(q.amounts_used, amounts(&[10, 27]));
        assert_eq!(q.refunds, amounts(&[0, 73]));
    }

    #[test]
    fn single_asset_join_pays_fee_on_swapped_part() {
        let Ok(q) = compute_shares_for_join(
            &pair(),
            fee(30),
            &amounts(&[1_000, 1_000]),
            Shares::new(1_000),
            &amounts(&[100, 0]),
        ) else {
            panic!("join");
        };
        assert_eq!(q.fees, amounts(&[1, 0]));
        assert_eq!(q.amounts_used, amounts(&[100, 0]));
        assert_eq!(q.shares, Shares::new(48));
    }

    #[test]
    fn mixed_join_rejected() {
        let inv = {
            let Ok(w) = Weight::equal(3) else {
                panic!("weights");
            };
            let Ok(inv) = WeightedInvariant::new(w) else {
                panic!("invariant");
            };
            inv
        };
        assert!(matches!(
            compute_shares_for_join(
                &inv,
                fee(30),
                &amounts(&[1_000, 1_000, 1_000]),
                Shares::new(1_000),
                &amounts(&[10, 10, 0]),
            ),
            Err(AmmError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn dust_join_rejected() {
        assert!(matches!(
            compute_shares_for_join(
                &pair(),
                fee(30),
                &amounts(&[1_000_000, 1_000_000]),
                Shares::new(1_000),
                &amounts(&[1, 1]),
            ),
            Err(AmmError::InvalidQuantity(_))
        ));
    }

    // -- exit ---------------------------------------------------------------

    #[test]
    fn exit_half() {
        let Ok(q) = compute_amounts_for_exit(&amounts(&[1_000, 1_000]), Shares::new(1_000), Shares::new(500)) else {
            panic!("exit");
        };
        assert_eq!(q.amounts_out, amounts(&[500, 500]));
    }

    #[test]
    fn exit_rounds_down() {
        let Ok(q) = compute_amounts_for_exit(&amounts(&[1_000, 999]), Shares::new(3), Shares::new(1)) else {
            panic!("exit");
        };
        assert_eq!(q.amounts_out, amounts(&[333, 333]));
    }

    #[test]
    fn exit_errors() {
        assert_eq!(
            compute_amounts_for_exit(&amounts(&[0, 0]), Shares::ZERO, Shares::new(1)),
            Err(AmmError::EmptyPool)
        );
        assert_eq!(
            compute_amounts_for_exit(&amounts(&[10, 10]), Shares::new(10), Shares::new(11)),
            Err(AmmError::InsufficientShares)
        );
    }
}
