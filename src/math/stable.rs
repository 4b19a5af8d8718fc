//! StableSwap invariant solvers for `n` coins.
//!
//! ```text
//! A·nⁿ·Σx + D = A·D·nⁿ + D^(n+1) / (nⁿ·Πx)
//! ```
//!
//! `A` is the amplification coefficient and `D` the invariant, equal to
//! `Σx` when all balances are equal.  Both solvers iterate Newton-Raphson
//! on 256-bit integers and stop once consecutive iterates differ by at
//! most one unit.  Following the usual Curve convention `Ann` is `A·n`.

use super::rounding::to_u128;
use super::wide::U256;
use crate::error::{AmmError, Result};

/// Newton-Raphson iteration cap.
pub const MAX_ITERATIONS: u32 = 256;

/// Convergence threshold between iterates, in raw units.
const CONVERGENCE_THRESHOLD: u128 = 1;

fn n_coins(balances: &[u128]) -> Result<U256> {
    if balances.len() < 2 {
        return Err(AmmError::LengthMismatch("stableswap needs at least two balances"));
    }
    Ok(U256::from(balances.len() as u64))
}

fn ann(amp: u128, n: U256) -> Result<U256> {
    if amp == 0 {
        return Err(AmmError::InvalidConfiguration("amplification must be positive"));
    }
    U256::from(amp)
        .checked_mul(n)
        .ok_or(AmmError::Overflow("Ann overflow"))
}

/// `D^(n+1) / (nⁿ·Πx)`, built up one balance at a time.
fn d_product(d: U256, balances: &[u128], n: U256) -> Result<U256> {
    let mut d_p = d;
    for &x in balances {
        let nx = U256::from(x)
            .checked_mul(n)
            .ok_or(AmmError::Overflow("D_P: n·x overflow"))?;
        if nx.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        d_p = d_p
            .checked_mul(d)
            .ok_or(AmmError::Overflow("D_P: product overflow"))?
            / nx;
    }
    Ok(d_p)
}

/// Computes the invariant `D` for `balances`.
///
/// Iterates
///
/// ```text
/// D' = (Ann·S + n·D_P) · D / ((Ann − 1)·D + (n + 1)·D_P)
/// ```
///
/// from `D = S`.  An all-zero pool has `D = 0`.
///
/// # Errors
///
/// [`AmmError::DivisionByZero`] when a single balance is zero,
/// [`AmmError::Overflow`] for balances whose powers exceed 256 bits, and
/// [`AmmError::NewtonRaphsonNonConvergence`] after [`MAX_ITERATIONS`].
pub fn compute_d(balances: &[u128], amp: u128) -> Result<u128> {
    let n = n_coins(balances)?;
    let ann = ann(amp, n)?;
    let mut s = U256::zero();
    for &x in balances {
        s += U256::from(x);
    }
    if s.is_zero() {
        return Ok(0);
    }

    let mut d = s;
    for _ in 0..MAX_ITERATIONS {
        let d_p = d_product(d, balances, n)?;
        let d_prev = d;
        let numerator = ann
            .checked_mul(s)
            .and_then(|v| v.checked_add(n.checked_mul(d_p)?))
            .and_then(|v| v.checked_mul(d))
            .ok_or(AmmError::Overflow("D: numerator overflow"))?;
        let denominator = (ann - U256::one())
            .checked_mul(d)
            .and_then(|v| v.checked_add((n + U256::one()).checked_mul(d_p)?))
            .ok_or(AmmError::Overflow("D: denominator overflow"))?;
        if denominator.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        d = numerator / denominator;
        let diff = if d > d_prev { d - d_prev } else { d_prev - d };
        if diff <= U256::from(CONVERGENCE_THRESHOLD) {
            return to_u128(d, "D exceeds u128");
        }
    }
    Err(AmmError::NewtonRaphsonNonConvergence(
        "D computation did not converge within 256 iterations",
    ))
}

/// Solves for balance `j` after balance `i` is set to `x_new`, holding `D`
/// fixed.
///
/// With `S'` and `P'` the sum and product of every balance except `j`:
///
/// ```text
/// c  = D^(n+1) / (nⁿ · P' · Ann · n)
/// b  = S' + D / Ann
/// y' = (y² + c) / (2y + b − D)
/// ```
///
/// # Errors
///
/// [`AmmError::InvalidAsset`] for bad or equal indices, plus the errors
/// of [`compute_d`].
pub fn compute_y(balances: &[u128], amp: u128, i: usize, j: usize, x_new: u128, d: u128) -> Result<u128> {
    let n = n_coins(balances)?;
    if i == j || i >= balances.len() || j >= balances.len() {
        return Err(AmmError::InvalidAsset("stableswap index out of range"));
    }
    let ann = ann(amp, n)?;
    let d = U256::from(d);

    let mut c = d;
    let mut s = U256::zero();
    for (k, &balance) in balances.iter().enumerate() {
        let x = if k == i {
            x_new
        } else if k == j {
            continue;
        } else {
            balance
        };
        let x = U256::from(x);
        s += x;
        let nx = x
            .checked_mul(n)
            .ok_or(AmmError::Overflow("y: n·x overflow"))?;
        if nx.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        c = c
            .checked_mul(d)
            .ok_or(AmmError::Overflow("y: c overflow"))?
            / nx;
    }
    c = c
        .checked_mul(d)
        .ok_or(AmmError::Overflow("y: c overflow"))?
        / (ann * n);
    let b = s + d / ann;

    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
        let y_prev = y;
        let numerator = y
            .checked_mul(y)
            .and_then(|v| v.checked_add(c))
            .ok_or(AmmError::Overflow("y: numerator overflow"))?;
        let denominator = (y + y + b)
            .checked_sub(d)
            .ok_or(AmmError::Underflow("y: denominator underflow"))?;
        if denominator.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        y = numerator / denominator;
        let diff = if y > y_prev { y - y_prev } else { y_prev - y };
        if diff <= U256::from(CONVERGENCE_THRESHOLD) {
            return to_u128(y, "y exceeds u128");
        }
    }
    Err(AmmError::NewtonRaphsonNonConvergence(
        "y computation did not converge within 256 iterations",
    ))
}

/// `D_P = D^(n+1) / (nⁿ·Πx)` for spot-price evaluation.
///
/// # Errors
///
/// As [`compute_d`].
pub fn d_p(balances: &[u128], d: u128) -> Result<u128> {
    let n = n_coins(balances)?;
    to_u128(d_product(U256::from(d), balances, n)?, "D_P exceeds u128")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn d_of_zero_pool() {
        assert_eq!(compute_d(&[0, 0], 100), Ok(0));
    }

    #[test]
    fn d_balanced_equals_sum() {
        let Ok(d) = compute_d(&[1_000_000, 1_000_000], 100) else {
            panic!("expected Ok");
        };
        assert!(d.abs_diff(2_000_000) <= 1, "D = {d}");
        let Ok(d3) = compute_d(&[1_000_000; 3], 50) else {
            panic!("expected Ok");
        };
        assert!(d3.abs_diff(3_000_000) <= 1, "D = {d3}");
    }

    #[test]
    fn d_imbalanced_below_sum() {
        let Ok(d) = compute_d(&[1_500_000, 500_000], 100) else {
            panic!("expected Ok");
        };
        assert!(d < 2_000_000 && d > 1_990_000, "D = {d}");
    }

    #[test]
    fn d_rejects_single_zero() {
        assert_eq!(compute_d(&[1_000, 0], 100), Err(AmmError::DivisionByZero));
        assert!(compute_d(&[1_000], 100).is_err());
        assert!(compute_d(&[1_000, 1_000], 0).is_err());
    }

    #[test]
    fn y_preserves_d() {
        let balances = [1_000_000u128, 1_000_000];
        let Ok(d) = compute_d(&balances, 100) else {
            panic!("expected D");
        };
        let Ok(y) = compute_y(&balances, 100, 0, 1, 1_010_000, d) else {
            panic!("expected y");
        };
        // Near the peg almost 1:1.
        assert!(y < 990_100 && y > 989_900, "y = {y}");
        let Ok(d_after) = compute_d(&[1_010_000, y], 100) else {
            panic!("expected D after");
        };
        assert!(d_after.abs_diff(d) <= 2);
    }

    #[test]
    fn y_three_coins() {
        let balances = [1_000_000u128, 2_000_000, 1_500_000];
        let Ok(d) = compute_d(&balances, 200) else {
            panic!("expected D");
        };
        let Ok(y) = compute_y(&balances, 200, 2, 0, 1_600_000, d) else {
            panic!("expected y");
        };
        assert!(y < 1_000_000);
        let Ok(d_after) = compute_d(&[y, 2_000_000, 1_600_000], 200) else {
            panic!("expected D after");
        };
        assert!(d_after.abs_diff(d) <= 3);
    }

    #[test]
    fn y_rejects_bad_indices() {
        assert!(compute_y(&[10, 10], 10, 0, 0, 5, 20).is_err());
        assert!(compute_y(&[10, 10], 10, 0, 2, 5, 20).is_err());
    }
}
