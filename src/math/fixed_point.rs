//! 18-decimal fixed-point helpers.
//!
//! A WAD value `x` stands for `x / 10^18`.  Ratios, weights, exponents and
//! prices travel in this format; raw token amounts never do.

use super::rounding::mul_div;
use crate::domain::Rounding;
use crate::error::Result;

/// Fixed-point one.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// `a × b`, rounded down.
///
/// # Errors
///
/// [`AmmError::Overflow`](crate::error::AmmError::Overflow).
pub fn mul_down(a: u128, b: u128) -> Result<u128> {
    mul_div(a, b, WAD, Rounding::Down)
}

/// `a × b`, rounded up.
///
/// # Errors
///
/// [`AmmError::Overflow`](crate::error::AmmError::Overflow).
pub fn mul_up(a: u128, b: u128) -> Result<u128> {
    mul_div(a, b, WAD, Rounding::Up)
}

/// `a / b`, rounded down.
///
/// # Errors
///
/// [`AmmError::DivisionByZero`](crate::error::AmmError::DivisionByZero) or
/// [`AmmError::Overflow`](crate::error::AmmError::Overflow).
pub fn div_down(a: u128, b: u128) -> Result<u128> {
    mul_div(a, WAD, b, Rounding::Down)
}

/// `a / b`, rounded up.
///
/// # Errors
///
/// [`AmmError::DivisionByZero`](crate::error::AmmError::DivisionByZero) or
/// [`AmmError::Overflow`](crate::error::AmmError::Overflow).
pub fn div_up(a: u128, b: u128) -> Result<u128> {
    mul_div(a, WAD, b, Rounding::Up)
}

/// `1 - x`, floored at zero.
#[must_use]
pub const fn complement(x: u128) -> u128 {
    WAD.saturating_sub(x)
}
