//! Raw token amount with checked arithmetic.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Rounding;

/// A raw token quantity in the asset's smallest unit.
///
/// Reserves, deposits, outputs, refunds and fees are all `Amount`s.  The
/// type never interprets decimals; every `u128` is a valid amount.
/// Arithmetic is checked and returns `None` instead of panicking.
///
/// # Examples
///
/// ```
/// use weighted_amm_core::domain::{Amount, Rounding};
///
/// let reserve = Amount::new(1_000);
/// let out = Amount::new(90);
/// assert_eq!(reserve.checked_sub(&out), Some(Amount::new(910)));
/// assert_eq!(reserve.checked_div(&Amount::new(3), Rounding::Up), Some(Amount::new(334)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Wraps a raw `u128`.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication. `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division in the given rounding direction.  `None` if
    /// `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        match crate::math::div_round(self.0, divisor.0, rounding) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the smaller of two amounts.
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn constants_and_default() {
        assert_eq!(Amount::ZERO.get(), 0);
        assert_eq!(Amount::MAX.get(), u128::MAX);
        assert_eq!(Amount::default(), Amount::ZERO);
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::new(1).is_zero());
    }

    #[test]
    fn add_sub_overflow() {
        assert_eq!(Amount::MAX.checked_add(&Amount::new(1)), None);
        assert_eq!(Amount::ZERO.checked_sub(&Amount::new(1)), None);
        assert_eq!(
            Amount::new(5).checked_add(&Amount::new(7)),
            Some(Amount::new(12))
        );
    }

    #[test]
    fn mul_overflow() {
        assert_eq!(Amount::MAX.checked_mul(&Amount::new(2)), None);
        assert_eq!(
            Amount::new(6).checked_mul(&Amount::new(7)),
            Some(Amount::new(42))
        );
    }

    #[test]
    fn div_rounding_directions() {
        let a = Amount::new(10);
        let b = Amount::new(4);
        assert_eq!(a.checked_div(&b, Rounding::Down), Some(Amount::new(2)));
        assert_eq!(a.checked_div(&b, Rounding::Up), Some(Amount::new(3)));
        assert_eq!(a.checked_div(&Amount::ZERO, Rounding::Down), None);
    }

    #[test]
    fn div_up_near_max() {
        assert_eq!(
            Amount::MAX.checked_div(&Amount::new(2), Rounding::Up),
            Some(Amount::new(u128::MAX / 2 + 1))
        );
    }

    #[test]
    fn min_picks_smaller() {
        assert_eq!(Amount::new(3).min(Amount::new(9)), Amount::new(3));
    }

    #[test]
    fn serializes_as_bare_number() {
        let Ok(json) = serde_json::to_string(&Amount::new(90)) else {
            panic!("serialize failed");
        };
        assert_eq!(json, "90");
    }
}
