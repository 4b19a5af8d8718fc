//! `Result`-returning arithmetic for quantity newtypes.
//!
//! ```
//! use weighted_amm_core::domain::Amount;
//! use weighted_amm_core::math::CheckedArithmetic;
//!
//! let reserve = Amount::new(1_000);
//! assert!(reserve.safe_sub(&Amount::new(1_001)).is_err());
//! ```

use crate::domain::{Amount, Rounding, Shares};
use crate::error::{AmmError, Result};

/// Fallible arithmetic that names the failure instead of returning `None`.
///
/// No method panics or saturates.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`].
    fn safe_add(&self, other: &Self) -> Result<Self>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// [`AmmError::Underflow`].
    fn safe_sub(&self, other: &Self) -> Result<Self>;

    /// `self × num / den` with a 256-bit intermediate.
    ///
    /// # Errors
    ///
    /// [`AmmError::DivisionByZero`] or [`AmmError::Overflow`].
    fn safe_mul_div(&self, num: u128, den: u128, rounding: Rounding) -> Result<Self>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    fn safe_mul_div(&self, num: u128, den: u128, rounding: Rounding) -> Result<Self> {
        super::mul_div(self.get(), num, den, rounding).map(Amount::new)
    }
}

impl CheckedArithmetic for Shares {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("share supply overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("share subtraction underflow"))
    }

    fn safe_mul_div(&self, num: u128, den: u128, rounding: Rounding) -> Result<Self> {
        super::mul_div(self.get(), num, den, rounding).map(Shares::new)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- Amount ---------------------------------------------------------------

    #[test]
    fn amount_add_sub() {
        let Ok(r) = Amount::new(100).safe_add(&Amount::new(200)) else {
            panic!("expected Ok");
        };
        assert_eq!(r, Amount::new(300));
        let Err(AmmError::Underflow(_)) = Amount::new(1).safe_sub(&Amount::new(2)) else {
            panic!("expected Underflow");
        };
        let Err(AmmError::Overflow(_)) = Amount::MAX.safe_add(&Amount::new(1)) else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn amount_mul_div() {
        assert_eq!(
            Amount::new(1_000).safe_mul_div(3, 7, Rounding::Up),
            Ok(Amount::new(429))
        );
        assert_eq!(
            Amount::new(1_000).safe_mul_div(3, 0, Rounding::Up),
            Err(AmmError::DivisionByZero)
        );
    }

    // -- Shares ---------------------------------------------------------------

    #[test]
    fn shares_add_sub() {
        assert_eq!(
            Shares::new(5).safe_add(&Shares::new(5)),
            Ok(Shares::new(10))
        );
        let Err(AmmError::Underflow(_)) = Shares::ZERO.safe_sub(&Shares::new(1)) else {
            panic!("expected Underflow");
        };
    }

    #[test]
    fn shares_mul_div_rounds_down() {
        assert_eq!(
            Shares::new(1_000).safe_mul_div(1, 3, Rounding::Down),
            Ok(Shares::new(333))
        );
    }
}
