//! Normalized asset weights.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::fee_rate::BPS_DENOMINATOR;
use crate::error::{AmmError, Result};
use crate::math::{U256, WAD};

/// Smallest admissible weight: 1 %.
pub const MIN_WEIGHT_BPS: u32 = 100;

/// One asset's share of a weighted pool's value, in basis points.
///
/// A pool's weights sum to exactly 10 000; that check lives with the pool
/// configuration since a single weight cannot see its siblings.
///
/// # Examples
///
/// ```
/// use weighted_amm_core::domain::Weight;
///
/// let Ok(w) = Weight::new(8_000) else { panic!() };
/// assert_eq!(w.to_wad(), 800_000_000_000_000_000);
/// assert!(Weight::new(50).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Weight(u32);

impl Weight {
    /// Creates a weight.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidWeight`] outside `100..=9_900` bp.
    pub const fn new(bps: u32) -> Result<Self> {
        if bps < MIN_WEIGHT_BPS {
            return Err(AmmError::InvalidWeight("weight below 1%"));
        }
        if bps > BPS_DENOMINATOR - MIN_WEIGHT_BPS {
            return Err(AmmError::InvalidWeight("weight above 99%"));
        }
        Ok(Self(bps))
    }

    /// Raw basis points.
    #[must_use]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Weight as an 18-decimal fixed-point fraction of one.
    #[must_use]
    pub const fn to_wad(&self) -> u128 {
        (self.0 as u128) * (WAD / BPS_DENOMINATOR as u128)
    }

    /// `n` equal weights summing to 10 000 bp; the first weights absorb
    /// the remainder when 10 000 is not divisible by `n`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidWeight`] if `n` is zero or so large that
    /// a weight would fall below 1 %.
    pub fn equal(n: usize) -> Result<Vec<Self>> {
        let n32 = u32::try_from(n).map_err(|_| AmmError::InvalidWeight("too many assets"))?;
        if n32 == 0 {
            return Err(AmmError::InvalidWeight("no assets"));
        }
        let base = BPS_DENOMINATOR / n32;
        let extra = BPS_DENOMINATOR % n32;
        (0..n32)
            .map(|i| Self::new(base + u32::from(i < extra)))
            .collect()
    }

    /// Weights proportional to a deposit: `amounts[i] / Σ amounts` in
    /// basis points, summing to exactly 10 000.
    ///
    /// Basis points lost to flooring go to the largest remainders, ties to
    /// the lower index.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if any share falls outside
    ///   `100..=9_900` bp, a zero amount included.
    /// - [`AmmError::Overflow`] if the amounts sum past `u128`.
    pub fn from_deposit(amounts: &[Amount]) -> Result<Vec<Self>> {
        let total = amounts
            .iter()
            .try_fold(0u128, |acc, a| acc.checked_add(a.get()))
            .ok_or(AmmError::Overflow("deposit total"))?;
        if total == 0 {
            return Err(AmmError::InvalidWeight("empty deposit"));
        }
        let total = U256::from(total);
        let denom = U256::from(BPS_DENOMINATOR);
        let mut bps = Vec::with_capacity(amounts.len());
        let mut remainders = Vec::with_capacity(amounts.len());
        for a in amounts {
            let scaled = U256::from(a.get()) * denom;
            // scaled / total <= 10 000
            bps.push((scaled / total).low_u32());
            remainders.push(scaled % total);
        }
        let assigned: u32 = bps.iter().sum();
        let mut order: Vec<usize> = (0..amounts.len()).collect();
        order.sort_by(|&x, &y| remainders.get(y).cmp(&remainders.get(x)).then(x.cmp(&y)));
        for idx in order.into_iter().take((BPS_DENOMINATOR - assigned) as usize) {
            if let Some(b) = bps.get_mut(idx) {
                *b += 1;
            }
        }
        bps.into_iter().map(Self::new).collect()
    }
}

impl TryFrom<u32> for Weight {
    type Error = AmmError;

    fn try_from(bps: u32) -> Result<Self> {
        Self::new(bps)
    }
}

impl From<Weight> for u32 {
    fn from(w: Weight) -> Self {
        w.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
