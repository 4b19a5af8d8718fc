//! The invariant evaluator: stateless pricing for one pool kind.
//!
//! An evaluator knows a kind's curve (weights or amplification) and
//! nothing else.  Reserves and the fee rate are passed in, results come
//! back as values; nothing is mutated.  Required methods cover the curve
//! itself; provided methods wrap them with validation, fees, trade limits
//! and the exact-out search so every kind quotes the same way.
//!
//! # Rounding
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | amount out | down |
//! | amount in, fee | up |
//! | invariant ratio | down |

use crate::domain::{Amount, FeeRate, Price, Shares, SwapQuote};
use crate::error::{AmmError, Result};

/// Upper bound on bracket-widening steps in the exact-out search.
const MAX_BRACKET_STEPS: u32 = 128;

/// Pricing primitives of one invariant.
///
/// Implementations may assume the provided methods already validated
/// indices, lengths and non-zero reserves.
pub trait InvariantEvaluator {
    /// Number of assets this evaluator prices.
    fn asset_count(&self) -> usize;

    /// Output for a post-fee input, rounded down, without trade limits.
    ///
    /// Must be non-decreasing in `net_in` and return zero for zero input.
    ///
    /// # Errors
    ///
    /// Arithmetic errors only.
    fn out_given_in(&self, reserves: &[Amount], i: usize, j: usize, net_in: Amount) -> Result<Amount>;

    /// Closed-form estimate of the post-fee input that buys `amount_out`.
    ///
    /// May be off by a few units in either direction; the exact-out search
    /// refines it.
    ///
    /// # Errors
    ///
    /// Arithmetic errors only.
    fn estimate_in_given_out(
        &self,
        reserves: &[Amount],
        i: usize,
        j: usize,
        amount_out: Amount,
    ) -> Result<Amount>;

    /// Growth of the invariant from `before` to `after`, as a WAD ratio
    /// rounded down.
    ///
    /// # Errors
    ///
    /// Arithmetic errors, or [`AmmError::InsufficientLiquidity`] when
    /// `before` has an empty reserve.
    fn invariant_ratio(&self, before: &[Amount], after: &[Amount]) -> Result<u128>;

    /// Marginal price of `base` in units of `quote`.
    ///
    /// # Errors
    ///
    /// Validation errors for bad indices, arithmetic errors otherwise.
    fn spot_price(&self, reserves: &[Amount], base: usize, quote: usize) -> Result<Price>;

    /// Shares minted for the first deposit into an empty pool: the value
    /// of the invariant for `amounts`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidQuantity`] if any amount is zero.
    fn bootstrap_shares(&self, amounts: &[Amount]) -> Result<Shares>;

    /// Confirms a swap from `before` to `after` did not shrink the
    /// invariant.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvariantViolation`].
    fn verify_swap(&self, before: &[Amount], after: &[Amount]) -> Result<()>;

    /// Rejects exact-in trades the kind considers too large.
    ///
    /// # Errors
    ///
    /// [`AmmError::SwapLimitExceeded`].
    fn check_exact_in_limit(&self, _reserves: &[Amount], _i: usize, _j: usize, _net_in: Amount) -> Result<()> {
        Ok(())
    }

    /// Rejects exact-out trades the kind considers too large.
    ///
    /// # Errors
    ///
    /// [`AmmError::SwapLimitExceeded`].
    fn check_exact_out_limit(
        &self,
        _reserves: &[Amount],
        _i: usize,
        _j: usize,
        _amount_out: Amount,
    ) -> Result<()> {
        Ok(())
    }

    /// Prices an exact-input swap.
    ///
    /// The fee is `ceil(amount_in × bps / 10 000)` and never reaches the
    /// reserves.
    ///
    /// # Errors
    ///
    /// - Validation errors from [`validate_swap`].
    /// - [`AmmError::InvalidQuantity`] if the output rounds to zero.
    /// - [`AmmError::SwapLimitExceeded`] from the kind's limits.
    /// - [`AmmError::InvariantViolation`] if the output would empty the
    ///   reserve.
    fn compute_out_given_in(
        &self,
        reserves: &[Amount],
        fee: FeeRate,
        i: usize,
        j: usize,
        amount_in: Amount,
    ) -> Result<SwapQuote> {
        validate_swap(reserves, self.asset_count(), i, j, amount_in)?;
        let (net_in, fee_amount) = fee.split(amount_in)?;
        self.check_exact_in_limit(reserves, i, j, net_in)?;
        let amount_out = if net_in.is_zero() {
            Amount::ZERO
        } else {
            self.out_given_in(reserves, i, j, net_in)?
        };
        if amount_out.is_zero() {
            return Err(AmmError::InvalidQuantity("swap output rounds to zero"));
        }
        if amount_out >= reserve(reserves, j)? {
            return Err(AmmError::InvariantViolation("swap would empty the output reserve"));
        }
        Ok(SwapQuote {
            index_in: i,
            index_out: j,
            amount_in,
            amount_out,
            fee: fee_amount,
        })
    }

    /// Prices an exact-output swap.
    ///
    /// The post-fee input is the smallest one whose exact-in output covers
    /// `amount_out`; it is then grossed up for the fee.  Quoting the output
    /// of an exact-in trade therefore never asks for more than that trade
    /// paid.
    ///
    /// # Errors
    ///
    /// - Validation errors from [`validate_swap`].
    /// - [`AmmError::InsufficientLiquidity`] if `amount_out` is not below
    ///   the output reserve.
    /// - [`AmmError::SwapLimitExceeded`] from the kind's limits.
    /// - [`AmmError::NewtonRaphsonNonConvergence`] if the search cannot
    ///   bracket the input.
    fn compute_in_given_out(
        &self,
        reserves: &[Amount],
        fee: FeeRate,
        i: usize,
        j: usize,
        amount_out: Amount,
    ) -> Result<SwapQuote> {
        validate_swap(reserves, self.asset_count(), i, j, amount_out)?;
        if amount_out >= reserve(reserves, j)? {
            return Err(AmmError::InsufficientLiquidity);
        }
        self.check_exact_out_limit(reserves, i, j, amount_out)?;
        let net_in = min_net_in(self, reserves, i, j, amount_out)?;
        let amount_in = fee.gross_up(net_in)?;
        let (_, fee_amount) = fee.split(amount_in)?;
        Ok(SwapQuote {
            index_in: i,
            index_out: j,
            amount_in,
            amount_out,
            fee: fee_amount,
        })
    }
}

/// Common swap preconditions.
///
/// # Errors
///
/// - [`AmmError::LengthMismatch`] if `reserves.len() != asset_count`.
/// - [`AmmError::InvalidAsset`] for out-of-range or equal indices.
/// - [`AmmError::InvalidQuantity`] for a zero amount.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is empty.
pub fn validate_swap(reserves: &[Amount], asset_count: usize, i: usize, j: usize, amount: Amount) -> Result<()> {
    if reserves.len() != asset_count {
        return Err(AmmError::LengthMismatch("reserves do not match the pool's assets"));
    }
    if i >= asset_count || j >= asset_count {
        return Err(AmmError::InvalidAsset("asset index out of range"));
    }
    if i == j {
        return Err(AmmError::InvalidAsset("token in and token out must differ"));
    }
    if amount.is_zero() {
        return Err(AmmError::InvalidQuantity("swap amount must be non-zero"));
    }
    if reserve(reserves, i)?.is_zero() || reserve(reserves, j)?.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(())
}

/// Bounds-checked reserve lookup.
pub(crate) fn reserve(reserves: &[Amount], idx: usize) -> Result<Amount> {
    reserves
        .get(idx)
        .copied()
        .ok_or(AmmError::InvalidAsset("asset index out of range"))
}

fn out_at<E: InvariantEvaluator + ?Sized>(
    eval: &E,
    reserves: &[Amount],
    i: usize,
    j: usize,
    x: u128,
) -> Result<Amount> {
    if x == 0 {
        return Ok(Amount::ZERO);
    }
    eval.out_given_in(reserves, i, j, Amount::new(x))
}

/// Smallest `x` with `out_given_in(x) >= amount_out`.
fn min_net_in<E: InvariantEvaluator + ?Sized>(
    eval: &E,
    reserves: &[Amount],
    i: usize,
    j: usize,
    amount_out: Amount,
) -> Result<Amount> {
    let estimate = eval.estimate_in_given_out(reserves, i, j, amount_out)?.get();
    let overflow = AmmError::Overflow("exact-out search overflow");

    // Upper bracket: some x that buys at least amount_out.
    let mut hi = estimate.max(1);
    let mut step = estimate / 1_000_000_000_000 + 1;
    let mut steps = 0;
    while out_at(eval, reserves, i, j, hi)? < amount_out {
        hi = hi.checked_add(step).ok_or(overflow)?;
        step = step.checked_mul(2).ok_or(overflow)?;
        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            return Err(AmmError::NewtonRaphsonNonConvergence("exact-out search could not bracket"));
        }
    }

    // Lower bracket: some x that does not.
    let mut gap = estimate / 1_000_000_000_000 + 8;
    let mut lo = hi.saturating_sub(gap);
    steps = 0;
    while lo > 0 && out_at(eval, reserves, i, j, lo)? >= amount_out {
        hi = lo;
        gap = gap.checked_mul(2).ok_or(overflow)?;
        lo = lo.saturating_sub(gap);
        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            return Err(AmmError::NewtonRaphsonNonConvergence("exact-out search could not bracket"));
        }
    }

    // out(lo) < amount_out <= out(hi)
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if out_at(eval, reserves, i, j, mid)? >= amount_out {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(Amount::new(hi))
}
