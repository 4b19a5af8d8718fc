//! StableSwap invariant (Curve style) for `n` pegged assets.
//!
//! ```text
//! A·nⁿ·Σx + D = A·D·nⁿ + D^(n+1) / (nⁿ·Πx)
//! ```
//!
//! | A | Curve |
//! |---|-------|
//! | 1 | close to constant product |
//! | 50–5 000 | flat near the peg |
//! | → ∞ | constant sum |
//!
//! Swaps solve for the new output balance with `D` held fixed and
//! withhold one unit from the output to absorb solver tolerance.

use crate::config::StableSwapConfig;
use crate::domain::{Amount, Price, Shares};
use crate::error::{AmmError, Result};
use crate::math::fixed_point::div_down;
use crate::math::stable::{compute_d, compute_y, d_p};
use crate::math::{U256, WAD};
use crate::traits::{FromConfig, InvariantEvaluator, reserve};

/// Widest denominator for which `remainder × WAD` still fits in 256 bits.
const PRICE_DEN_BITS: usize = 190;

/// Pricing for a StableSwap pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableSwapInvariant {
    amplification: u128,
    n: usize,
}

impl StableSwapInvariant {
    /// Builds an evaluator for `n` assets.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] for a zero amplification or
    /// fewer than two assets.
    pub const fn new(amplification: u128, n: usize) -> Result<Self> {
        if amplification == 0 {
            return Err(AmmError::InvalidConfiguration("amplification must be positive"));
        }
        if n < 2 {
            return Err(AmmError::InvalidConfiguration("stableswap needs at least two assets"));
        }
        Ok(Self { amplification, n })
    }

    /// Amplification coefficient `A`.
    #[must_use]
    pub const fn amplification(&self) -> u128 {
        self.amplification
    }

    /// Invariant `D` of `reserves`.
    ///
    /// # Errors
    ///
    /// As [`compute_d`], plus [`AmmError::LengthMismatch`].
    pub fn invariant(&self, reserves: &[Amount]) -> Result<u128> {
        compute_d(&self.raw(reserves)?, self.amplification)
    }

    fn raw(&self, reserves: &[Amount]) -> Result<Vec<u128>> {
        if reserves.len() != self.n {
            return Err(AmmError::LengthMismatch("reserves do not match the pool's assets"));
        }
        Ok(reserves.iter().map(Amount::get).collect())
    }
}

impl FromConfig<StableSwapConfig> for StableSwapInvariant {
    fn from_config(config: &StableSwapConfig) -> Result<Self> {
        config.validate()?;
        Self::new(u128::from(config.amplification()), config.assets().len())
    }
}

impl InvariantEvaluator for StableSwapInvariant {
    fn asset_count(&self) -> usize {
        self.n
    }

    fn out_given_in(&self, reserves: &[Amount], i: usize, j: usize, net_in: Amount) -> Result<Amount> {
        let balances = self.raw(reserves)?;
        let d = compute_d(&balances, self.amplification)?;
        let x_new = reserve(reserves, i)?
            .get()
            .checked_add(net_in.get())
            .ok_or(AmmError::Overflow("input reserve overflow"))?;
        let y = compute_y(&balances, self.amplification, i, j, x_new, d)?;
        let b_out = reserve(reserves, j)?.get();
        Ok(Amount::new(b_out.saturating_sub(y).saturating_sub(1)))
    }

    fn estimate_in_given_out(
        &self,
        reserves: &[Amount],
        i: usize,
        j: usize,
        amount_out: Amount,
    ) -> Result<Amount> {
        let balances = self.raw(reserves)?;
        let d = compute_d(&balances, self.amplification)?;
        let left = reserve(reserves, j)?
            .get()
            .checked_sub(amount_out.get())
            .filter(|v| *v > 0)
            .ok_or(AmmError::InsufficientLiquidity)?;
        let x = compute_y(&balances, self.amplification, j, i, left, d)?;
        let b_in = reserve(reserves, i)?.get();
        Ok(Amount::new(x.saturating_sub(b_in).saturating_add(1)))
    }

    fn invariant_ratio(&self, before: &[Amount], after: &[Amount]) -> Result<u128> {
        let d_before = self.invariant(before)?;
        if d_before == 0 {
            return Err(AmmError::InsufficientLiquidity);
        }
        div_down(self.invariant(after)?, d_before)
    }

    fn spot_price(&self, reserves: &[Amount], base: usize, quote: usize) -> Result<Price> {
        if base == quote {
            return Err(AmmError::InvalidAsset("base and quote must differ"));
        }
        let balances = self.raw(reserves)?;
        let x_b = reserve(reserves, base)?.get();
        let x_q = reserve(reserves, quote)?.get();
        if x_b == 0 || x_q == 0 {
            return Err(AmmError::InsufficientLiquidity);
        }
        let d = compute_d(&balances, self.amplification)?;
        let dp = U256::from(d_p(&balances, d)?);
        let ann = U256::from(self.amplification)
            .checked_mul(U256::from(self.n as u64))
            .ok_or(AmmError::Overflow("Ann overflow"))?;
        let overflow = AmmError::Overflow("spot price intermediate");
        // x_q·(Ann·x_b + D_P) / (x_b·(Ann·x_q + D_P))
        let leg = |x: u128| ann.checked_mul(U256::from(x)).and_then(|v| v.checked_add(dp));
        let mut num = leg(x_b)
            .and_then(|v| v.checked_mul(U256::from(x_q)))
            .ok_or(overflow)?;
        let mut den = leg(x_q)
            .and_then(|v| v.checked_mul(U256::from(x_b)))
            .ok_or(overflow)?;
        // Keep remainder × WAD inside 256 bits; below that width the
        // result is exact.
        let excess = den.bits().saturating_sub(PRICE_DEN_BITS);
        num = num >> excess;
        den = den >> excess;
        if den.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        let wad_u = U256::from(WAD);
        let whole = (num / den).checked_mul(wad_u).ok_or(overflow)?;
        let wad = whole
            .checked_add((num % den) * wad_u / den)
            .ok_or(overflow)?;
        if wad > U256::from(u128::MAX) {
            return Err(AmmError::Overflow("spot price exceeds u128"));
        }
        Ok(Price::from_wad(wad.low_u128()))
    }

    fn bootstrap_shares(&self, amounts: &[Amount]) -> Result<Shares> {
        let balances = self.raw(amounts)?;
        if balances.contains(&0) {
            return Err(AmmError::InvalidQuantity("bootstrap requires every asset"));
        }
        Ok(Shares::new(compute_d(&balances, self.amplification)?))
    }

    fn verify_swap(&self, before: &[Amount], after: &[Amount]) -> Result<()> {
        let d_before = self.invariant(before)?;
        let d_after = self.invariant(after)?;
        // D itself is only exact to one unit.
        if d_after.saturating_add(1) < d_before {
            return Err(AmmError::InvariantViolation("stableswap invariant decreased"));
        }
        Ok(())
    }
}
