//! Fixed-point spot price.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::math::WAD;

/// Marginal exchange rate in units of the quote asset per unit of the base
/// asset, as an 18-decimal fixed-point number.
///
/// # Examples
///
/// ```
/// use weighted_amm_core::domain::Price;
///
/// let p = Price::from_wad(1_500_000_000_000_000_000);
/// assert_eq!(p.integer_part(), 1);
/// assert_eq!(p.to_string(), "1.500000000000000000");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u128);

impl Price {
    /// Price of exactly one.
    pub const ONE: Self = Self(WAD);

    /// Wraps a WAD-scaled value.
    #[must_use]
    pub const fn from_wad(wad: u128) -> Self {
        Self(wad)
    }

    /// WAD-scaled value.
    #[must_use]
    pub const fn to_wad(&self) -> u128 {
        self.0
    }

    /// Whole units, truncated.
    #[must_use]
    pub const fn integer_part(&self) -> u128 {
        self.0 / WAD
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / WAD, self.0 % WAD)
    }
}
