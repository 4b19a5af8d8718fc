//! Swap fee rate in basis points.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::{AmmError, Result};
use crate::math::mul_div;

/// Basis-point denominator: 10 000 bp = 100 %.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Fraction of every swap input retained by the pool as a fee.
///
/// Valid range is `0 ≤ bps < 10 000`; a 100 % fee would make every
/// exact-out quote infinite.  Fees always round up, in the pool's favour.
///
/// # Examples
///
/// ```
/// use weighted_amm_core::domain::{Amount, FeeRate};
///
/// let Ok(fee) = FeeRate::new(30) else { panic!() };
/// // 0.3 % of 100 is 0.3, rounded up to 1.
/// assert_eq!(fee.fee_on(Amount::new(100)), Ok(Amount::new(1)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct FeeRate(u32);

impl FeeRate {
    /// No fee.
    pub const ZERO: Self = Self(0);

    /// Creates a fee rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if `bps >= 10_000`.
    pub const fn new(bps: u32) -> Result<Self> {
        if bps >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidFee("fee must be below 10000 bp"));
        }
        Ok(Self(bps))
    }

    /// Returns the rate in basis points.
    #[must_use]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// `true` when no fee is charged.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Fee charged on a gross input: `ceil(amount × bps / 10 000)`.
    ///
    /// # Errors
    ///
    /// Propagates [`AmmError::Overflow`] from the 256-bit product.
    pub fn fee_on(&self, amount: Amount) -> Result<Amount> {
        mul_div(
            amount.get(),
            u128::from(self.0),
            u128::from(BPS_DENOMINATOR),
            Rounding::Up,
        )
        .map(Amount::new)
    }

    /// Splits a gross input into `(net, fee)`.
    ///
    /// # Errors
    ///
    /// Propagates [`AmmError::Overflow`] from [`fee_on`](Self::fee_on).
    pub fn split(&self, gross: Amount) -> Result<(Amount, Amount)> {
        let fee = self.fee_on(gross)?;
        let net = gross
            .checked_sub(&fee)
            .ok_or(AmmError::Underflow("fee exceeds gross amount"))?;
        Ok((net, fee))
    }

    /// Smallest gross input whose net part covers `net`:
    /// `ceil(net × 10 000 / (10 000 − bps))`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the gross amount exceeds `u128`.
    pub fn gross_up(&self, net: Amount) -> Result<Amount> {
        let keep = u128::from(BPS_DENOMINATOR - self.0);
        let mut gross = mul_div(net.get(), u128::from(BPS_DENOMINATOR), keep, Rounding::Up)?;
        // `fee_on` also rounds up, so the first candidate can fall one
        // unit short.
        loop {
            let (n, _) = self.split(Amount::new(gross))?;
            if n >= net {
                return Ok(Amount::new(gross));
            }
            gross = gross
                .checked_add(1)
                .ok_or(AmmError::Overflow("gross-up overflow"))?;
        }
    }
}

impl TryFrom<u32> for FeeRate {
    type Error = AmmError;

    fn try_from(bps: u32) -> Result<Self> {
        Self::new(bps)
    }
}

impl From<FeeRate> for u32 {
    fn from(rate: FeeRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn rate(bps: u32) -> FeeRate {
        let Ok(r) = FeeRate::new(bps) else {
            panic!("valid fee {bps}");
        };
        r
    }

    #[test]
    fn rejects_full_fee() {
        assert!(FeeRate::new(9_999).is_ok());
        assert_eq!(
            FeeRate::new(10_000),
            Err(AmmError::InvalidFee("fee must be below 10000 bp"))
        );
    }

    #[test]
    fn fee_rounds_up() {
        assert_eq!(rate(30).fee_on(Amount::new(100)), Ok(Amount::new(1)));
        assert_eq!(rate(30).fee_on(Amount::new(10_000)), Ok(Amount::new(30)));
        assert_eq!(rate(0).fee_on(Amount::new(10_000)), Ok(Amount::ZERO));
    }

    #[test]
    fn split_is_exact() {
        let Ok((net, fee)) = rate(30).split(Amount::new(100)) else {
            panic!("split failed");
        };
        assert_eq!(net, Amount::new(99));
        assert_eq!(fee, Amount::new(1));
    }

    #[test]
    fn gross_up_covers_net() {
        for net in [1u128, 99, 997, 1_000_000, 123_456_789] {
            let Ok(gross) = rate(30).gross_up(Amount::new(net)) else {
                panic!("gross_up failed");
            };
            let Ok((n, _)) = rate(30).split(gross) else {
                panic!("split failed");
            };
            assert!(n.get() >= net);
            // One unit less would not cover the net amount.
            let Ok((smaller, _)) = rate(30).split(Amount::new(gross.get() - 1)) else {
                panic!("split failed");
            };
            assert!(smaller.get() < net);
        }
    }

    #[test]
    fn gross_up_zero_fee_is_identity() {
        assert_eq!(rate(0).gross_up(Amount::new(77)), Ok(Amount::new(77)));
    }

    #[test]
    fn deserialize_validates() {
        let ok: core::result::Result<FeeRate, _> = serde_json::from_str("30");
        assert_eq!(ok.ok(), Some(rate(30)));
        let bad: core::result::Result<FeeRate, _> = serde_json::from_str("10000");
        assert!(bad.is_err());
    }
}
