//! Rounding-aware integer division and `a × b / c` with wide intermediates.
//!
//! Every quotient in the crate goes through one of these helpers, always
//! with an explicit [`Rounding`]:
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | amount paid out, shares minted | [`Rounding::Down`] |
//! | amount paid in, fee, deposit used | [`Rounding::Up`] |
//!
//! ```
//! use weighted_amm_core::domain::Rounding;
//! use weighted_amm_core::math::{div_round, mul_div};
//!
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! // 1000 × 99 / 1099 = 90.08…
//! assert_eq!(mul_div(1_000, 99, 1_099, Rounding::Down), Ok(90));
//! assert_eq!(mul_div(u128::MAX, 2, 4, Rounding::Down), Ok(u128::MAX / 2));
//! ```

use super::wide::U256;
use crate::domain::Rounding;
use crate::error::{AmmError, Result};

/// `numerator / denominator` in the given direction; `None` when the
/// denominator is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        // q + 1 cannot overflow: a non-zero remainder implies q < u128::MAX.
        Rounding::Up if numerator % denominator != 0 => Some(q + 1),
        Rounding::Up => Some(q),
    }
}

/// `a × b / c` with a 256-bit product.
///
/// # Errors
///
/// [`AmmError::DivisionByZero`] when `c == 0`; [`AmmError::Overflow`] when
/// the quotient does not fit in `u128`.
pub fn mul_div(a: u128, b: u128, c: u128, rounding: Rounding) -> Result<u128> {
    if c == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let divisor = U256::from(c);
    let mut q = product / divisor;
    if rounding.is_up() && !(product % divisor).is_zero() {
        q += U256::one();
    }
    to_u128(q, "mul_div result exceeds u128")
}

/// `floor(sqrt(a × b))`, exact for any pair of `u128`.
#[must_use]
pub fn sqrt_product(a: u128, b: u128) -> u128 {
    // sqrt of a value below 2^256 is below 2^128.
    (U256::from(a) * U256::from(b)).integer_sqrt().low_u128()
}

pub(crate) fn to_u128(x: U256, context: &'static str) -> Result<u128> {
    if x > U256::from(u128::MAX) {
        return Err(AmmError::Overflow(context));
    }
    Ok(x.low_u128())
}
