//! Weighted invariant (Balancer style).
//!
//! ```text
//! Π Bᵢ ^ Wᵢ = k
//! ```
//!
//! When the two assets of a trade carry the same weight the curve between
//! them is an exact constant product, priced with plain 256-bit integer
//! arithmetic:
//!
//! ```text
//! out = B_out × net / (B_in + net)
//! ```
//!
//! Otherwise the trade goes through the fixed-point power function:
//!
//! ```text
//! out = B_out × (1 − (B_in / (B_in + net)) ^ (W_in / W_out))
//! in  = B_in  × ((B_out / (B_out − out)) ^ (W_out / W_in) − 1)
//! ```
//!
//! Powers are rounded so the pool never loses, and those trades are capped
//! at 30 % of the relevant reserve.
//!
//! The equal split of 10 000 bp is not always uniform (three assets get
//! 3334/3333/3333).  A pool holding exactly that split treats every pair
//! as equally weighted, so all of its trades take the exact path.

use crate::config::WeightedConfig;
use crate::domain::{Amount, BPS_DENOMINATOR, Price, Rounding, Shares, Weight};
use crate::error::{AmmError, Result};
use crate::math::fixed_point::{complement, div_down, div_up, mul_down, mul_up};
use crate::math::{WAD, mul_div, pow_down, pow_up, sqrt_product, weighted_geometric_mean, U256};
use crate::traits::{FromConfig, InvariantEvaluator, reserve};

/// Largest exact-in trade on a power-priced pair, relative to the input
/// reserve.
pub const MAX_IN_RATIO: u128 = 300_000_000_000_000_000;

/// Largest exact-out trade on a power-priced pair, relative to the output
/// reserve.
pub const MAX_OUT_RATIO: u128 = 300_000_000_000_000_000;

/// Pricing for a weighted pool.
///
/// # Examples
///
/// ```
/// use weighted_amm_core::domain::{Amount, FeeRate, Weight};
/// use weighted_amm_core::pools::WeightedInvariant;
/// use weighted_amm_core::traits::InvariantEvaluator;
///
/// let Ok(weights) = Weight::equal(2) else { panic!() };
/// let Ok(inv) = WeightedInvariant::new(weights) else { panic!() };
/// let Ok(fee) = FeeRate::new(30) else { panic!() };
/// let reserves = [Amount::new(1_000), Amount::new(1_000)];
/// let Ok(q) = inv.compute_out_given_in(&reserves, fee, 0, 1, Amount::new(100)) else { panic!() };
/// assert_eq!(q.amount_out, Amount::new(90));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedInvariant {
    weights: Vec<Weight>,
    equal_split: bool,
    from_deposit: bool,
}

impl WeightedInvariant {
    /// Builds an evaluator from normalized weights.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidWeight`] unless there are at least two weights
    /// summing to 10 000 bp.
    pub fn new(weights: Vec<Weight>) -> Result<Self> {
        if weights.len() < 2 {
            return Err(AmmError::InvalidWeight("at least two weights are required"));
        }
        if weights.iter().map(Weight::bps).sum::<u32>() != BPS_DENOMINATOR {
            return Err(AmmError::InvalidWeight("weights must sum to exactly 10000 bp"));
        }
        let equal_split = Weight::equal(weights.len())? == weights;
        Ok(Self {
            weights,
            equal_split,
            from_deposit: false,
        })
    }

    /// Evaluator for `n` assets whose weights are taken from the ratio of
    /// the bootstrap deposit.
    ///
    /// Until [`fix_weights`](Self::fix_weights) runs it prices with equal
    /// weights.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidWeight`] if `n` equal weights cannot be formed.
    pub fn deposit_weighted(n: usize) -> Result<Self> {
        let mut inv = Self::new(Weight::equal(n)?)?;
        inv.from_deposit = true;
        Ok(inv)
    }

    /// Weights in reserve order.
    #[must_use]
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Whether the weights still wait for the bootstrap deposit.
    #[must_use]
    pub const fn awaits_deposit(&self) -> bool {
        self.from_deposit
    }

    /// The evaluator after a bootstrap deposit of `amounts`.
    ///
    /// Fixed weights are kept as they are; pending ones become
    /// `amounts[i] / Σ amounts` in basis points.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidWeight`] if a deposit share falls below 1 %,
    /// [`AmmError::LengthMismatch`] if `amounts` does not cover every
    /// asset.
    pub fn fix_weights(&self, amounts: &[Amount]) -> Result<Self> {
        if !self.from_deposit {
            return Ok(self.clone());
        }
        self.check_lengths(amounts)?;
        Self::new(Weight::from_deposit(amounts)?)
    }

    fn weight(&self, idx: usize) -> Result<Weight> {
        self.weights
            .get(idx)
            .copied()
            .ok_or(AmmError::InvalidAsset("asset index out of range"))
    }

    fn same_weight(&self, i: usize, j: usize) -> Result<bool> {
        let (wi, wj) = (self.weight(i)?, self.weight(j)?);
        Ok(self.equal_split || wi == wj)
    }

    fn all_equal(&self) -> bool {
        self.equal_split || self.weights.windows(2).all(|w| w.first() == w.get(1))
    }

    fn check_lengths(&self, reserves: &[Amount]) -> Result<()> {
        if reserves.len() != self.weights.len() {
            return Err(AmmError::LengthMismatch("reserves do not match the pool's weights"));
        }
        Ok(())
    }
}

impl FromConfig<WeightedConfig> for WeightedInvariant {
    fn from_config(config: &WeightedConfig) -> Result<Self> {
        config.validate()?;
        match config.weights() {
            [] => Self::deposit_weighted(config.assets().len()),
            weights => Self::new(weights.to_vec()),
        }
    }
}

impl InvariantEvaluator for WeightedInvariant {
    fn asset_count(&self) -> usize {
        self.weights.len()
    }

    fn out_given_in(&self, reserves: &[Amount], i: usize, j: usize, net_in: Amount) -> Result<Amount> {
        let b_in = reserve(reserves, i)?.get();
        let b_out = reserve(reserves, j)?.get();
        let x = net_in.get();
        let denom = b_in
            .checked_add(x)
            .ok_or(AmmError::Overflow("input reserve overflow"))?;
        if self.same_weight(i, j)? {
            return mul_div(b_out, x, denom, Rounding::Down).map(Amount::new);
        }
        let base = div_up(b_in, denom)?;
        let exponent = div_down(self.weight(i)?.to_wad(), self.weight(j)?.to_wad())?;
        let power = pow_up(base, exponent)?;
        mul_down(b_out, complement(power)).map(Amount::new)
    }

    fn estimate_in_given_out(
        &self,
        reserves: &[Amount],
        i: usize,
        j: usize,
        amount_out: Amount,
    ) -> Result<Amount> {
        let b_in = reserve(reserves, i)?.get();
        let b_out = reserve(reserves, j)?.get();
        let y = amount_out.get();
        let left = b_out
            .checked_sub(y)
            .filter(|v| *v > 0)
            .ok_or(AmmError::InsufficientLiquidity)?;
        if self.same_weight(i, j)? {
            return mul_div(b_in, y, left, Rounding::Up).map(Amount::new);
        }
        let base = div_up(b_out, left)?;
        let exponent = div_up(self.weight(j)?.to_wad(), self.weight(i)?.to_wad())?;
        let power = pow_up(base, exponent)?;
        mul_up(b_in, power.saturating_sub(WAD)).map(Amount::new)
    }

    fn invariant_ratio(&self, before: &[Amount], after: &[Amount]) -> Result<u128> {
        self.check_lengths(before)?;
        self.check_lengths(after)?;
        let mut ratios = Vec::with_capacity(before.len());
        for (b, a) in before.iter().zip(after) {
            if b.is_zero() {
                return Err(AmmError::InsufficientLiquidity);
            }
            ratios.push(div_down(a.get(), b.get())?);
        }
        if let ([r0, r1], true) = (ratios.as_slice(), self.all_equal()) {
            // sqrt(r0 × r1) in WAD is the integer square root of the raw product.
            return Ok(sqrt_product(*r0, *r1));
        }
        let mut ratio = WAD;
        for (r, w) in ratios.iter().zip(&self.weights) {
            if *r == WAD {
                continue;
            }
            ratio = mul_down(ratio, pow_down(*r, w.to_wad())?)?;
        }
        Ok(ratio)
    }

    fn spot_price(&self, reserves: &[Amount], base: usize, quote: usize) -> Result<Price> {
        self.check_lengths(reserves)?;
        if base == quote {
            return Err(AmmError::InvalidAsset("base and quote must differ"));
        }
        let b_base = reserve(reserves, base)?.get();
        let b_quote = reserve(reserves, quote)?.get();
        if b_base == 0 || b_quote == 0 {
            return Err(AmmError::InsufficientLiquidity);
        }
        let raw = mul_div(b_quote, WAD, b_base, Rounding::Down)?;
        if self.same_weight(base, quote)? {
            return Ok(Price::from_wad(raw));
        }
        let scaled = mul_div(
            raw,
            u128::from(self.weight(base)?.bps()),
            u128::from(self.weight(quote)?.bps()),
            Rounding::Down,
        )?;
        Ok(Price::from_wad(scaled))
    }

    fn bootstrap_shares(&self, amounts: &[Amount]) -> Result<Shares> {
        self.check_lengths(amounts)?;
        if amounts.iter().any(Amount::is_zero) {
            return Err(AmmError::InvalidQuantity("bootstrap requires every asset"));
        }
        let shares = match amounts {
            [a0, a1] if self.all_equal() => sqrt_product(a0.get(), a1.get()),
            _ => {
                let values: Vec<u128> = amounts.iter().map(Amount::get).collect();
                let weights: Vec<u128> = self.weights.iter().map(Weight::to_wad).collect();
                weighted_geometric_mean(&values, &weights)?
            }
        };
        if shares == 0 {
            return Err(AmmError::InvalidQuantity("bootstrap deposit too small"));
        }
        Ok(Shares::new(shares))
    }

    fn verify_swap(&self, before: &[Amount], after: &[Amount]) -> Result<()> {
        self.check_lengths(before)?;
        self.check_lengths(after)?;
        let changed: Vec<usize> = (0..before.len())
            .filter(|&k| before.get(k) != after.get(k))
            .collect();
        if let [i, j] = changed.as_slice() {
            if self.same_weight(*i, *j)? {
                let k_before = U256::from(reserve(before, *i)?.get()) * U256::from(reserve(before, *j)?.get());
                let k_after = U256::from(reserve(after, *i)?.get()) * U256::from(reserve(after, *j)?.get());
                if k_after < k_before {
                    return Err(AmmError::InvariantViolation("constant product decreased"));
                }
                return Ok(());
            }
        }
        // Upper estimate of the growth; if even that is below one the
        // invariant shrank.
        let mut ratio = WAD;
        for ((b, a), w) in before.iter().zip(after).zip(&self.weights) {
            if b == a {
                continue;
            }
            if b.is_zero() {
                return Err(AmmError::InsufficientLiquidity);
            }
            let r = div_up(a.get(), b.get())?;
            ratio = mul_up(ratio, pow_up(r, w.to_wad())?)?;
        }
        if ratio < WAD {
            return Err(AmmError::InvariantViolation("weighted invariant decreased"));
        }
        Ok(())
    }

    fn check_exact_in_limit(&self, reserves: &[Amount], i: usize, j: usize, net_in: Amount) -> Result<()> {
        if self.same_weight(i, j)? {
            return Ok(());
        }
        let cap = mul_down(reserve(reserves, i)?.get(), MAX_IN_RATIO)?;
        if net_in.get() > cap {
            return Err(AmmError::SwapLimitExceeded("input above 30% of the reserve"));
        }
        Ok(())
    }

    fn check_exact_out_limit(
        &self,
        reserves: &[Amount],
        i: usize,
        j: usize,
        amount_out: Amount,
    ) -> Result<()> {
        if self.same_weight(i, j)? {
            return Ok(());
        }
        let cap = mul_down(reserve(reserves, j)?.get(), MAX_OUT_RATIO)?;
        if amount_out.get() > cap {
            return Err(AmmError::SwapLimitExceeded("output above 30% of the reserve"));
        }
        Ok(())
    }
}
