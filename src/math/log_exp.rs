//! Natural logarithm, exponential and power in deterministic integer math.
//!
//! Internally everything runs at 36 decimals (`1e36` ≙ 1.0) with 256-bit
//! products; results are handed back at 18 decimals.  Logarithms use
//! binary range reduction and the `atanh` series, exponentials reduce by
//! `ln 2` and sum a Taylor series.  The observed error of [`pow`] sits far
//! below [`MAX_POW_RELATIVE_ERROR`], which [`pow_up`] and [`pow_down`] add
//! or subtract so that callers can round in a known direction.
//!
//! ```
//! use weighted_amm_core::math::{pow, WAD};
//!
//! // 4 ^ 0.5 == 2
//! let Ok(r) = pow(4 * WAD, WAD / 2) else { panic!() };
//! assert!(r.abs_diff(2 * WAD) <= 10);
//! ```

use super::fixed_point::{WAD, mul_up};
use super::rounding::{mul_div, to_u128};
use super::wide::U256;
use crate::domain::Rounding;
use crate::error::{AmmError, Result};

/// Documented bound on the relative error of [`pow`]: 1e-13.
pub const MAX_POW_RELATIVE_ERROR: u128 = 100_000;

/// Internal scale: 36 decimals.
const ONE_36: u128 = 1_000_000_000_000_000_000_000_000_000_000_000_000;

/// `ln 2` at 36 decimals.
const LN2_36: i128 = 693_147_180_559_945_309_417_232_121_458_176_568;

/// Beyond this the exponential overflows any `u128` result.
const MAX_EXP_SHIFT: i128 = 200;

/// `ln(num / den)` at 36 decimals.
fn ln_ratio_36(num: u128, den: u128) -> Result<i128> {
    if num == 0 {
        return Err(AmmError::InvalidQuantity("logarithm of zero"));
    }
    if den == 0 {
        return Err(AmmError::DivisionByZero);
    }
    // Align bit lengths so num / den lands in (1/2, 2).
    let k = i128::from(u128::BITS - num.leading_zeros()) - i128::from(u128::BITS - den.leading_zeros());
    let (mut n, mut d) = (U256::from(num), U256::from(den));
    let shift = u32::try_from(k.unsigned_abs()).map_err(|_| AmmError::Overflow("ln range"))?;
    if k > 0 {
        d = d << shift;
    } else {
        n = n << shift;
    }
    let mut k = k;
    if n < d {
        n = n << 1u32;
        k -= 1;
    }
    // n, d < 2^129 here, so n × 1e36 fits in 256 bits.
    let m = to_u128(n * U256::from(ONE_36) / d, "ln mantissa")?;

    // ln m = 2 atanh(z), z = (m - 1) / (m + 1) in [0, 1/3).
    let z = mul_div(m - ONE_36, ONE_36, m + ONE_36, Rounding::Down)?;
    let z2 = mul_div(z, z, ONE_36, Rounding::Down)?;
    let mut term = z;
    let mut sum = z;
    let mut odd = 1u128;
    while term != 0 {
        term = mul_div(term, z2, ONE_36, Rounding::Down)?;
        odd += 2;
        sum += term / odd;
    }
    let mantissa = i128::try_from(2 * sum).map_err(|_| AmmError::Overflow("ln mantissa"))?;
    k.checked_mul(LN2_36)
        .and_then(|v| v.checked_add(mantissa))
        .ok_or(AmmError::Overflow("ln result"))
}

/// `floor(e^t × scale)` for `t` at 36 decimals.
fn exp_36(t: i128, scale: u128) -> Result<u128> {
    let k = t.div_euclid(LN2_36);
    let r = u128::try_from(t.rem_euclid(LN2_36)).map_err(|_| AmmError::Underflow("exp remainder"))?;
    if k > MAX_EXP_SHIFT {
        return Err(AmmError::Overflow("exponent too large"));
    }
    if k < -MAX_EXP_SHIFT {
        return Ok(0);
    }

    // e^r for r in [0, ln 2).
    let mut sum = ONE_36;
    let mut term = ONE_36;
    let mut n = 1u128;
    while term != 0 {
        term = mul_div(term, r, ONE_36 * n, Rounding::Down)?;
        sum += term;
        n += 1;
    }

    let scaled = U256::from(sum) * U256::from(scale);
    let shift = u32::try_from(k.unsigned_abs()).map_err(|_| AmmError::Overflow("exp shift"))?;
    let out = if k >= 0 {
        // sum < 2^122 and scale < 2^128 leave room for shifts up to 6.
        if scaled.bits() + shift as usize > 256 {
            return Err(AmmError::Overflow("exp result"));
        }
        (scaled << shift) / U256::from(ONE_36)
    } else {
        (scaled >> shift) / U256::from(ONE_36)
    };
    to_u128(out, "exp result exceeds u128")
}

/// Natural logarithm of a WAD value, as a signed WAD value.
///
/// # Errors
///
/// [`AmmError::InvalidQuantity`] for `x == 0`.
pub fn ln(x: u128) -> Result<i128> {
    Ok(ln_ratio_36(x, WAD)? / (ONE_36 / WAD) as i128)
}

/// `e^t` for a signed WAD exponent, as a WAD value rounded down.
///
/// # Errors
///
/// [`AmmError::Overflow`] when the result exceeds `u128`.
pub fn exp(t: i128) -> Result<u128> {
    let t36 = t
        .checked_mul((ONE_36 / WAD) as i128)
        .ok_or(AmmError::Overflow("exp argument"))?;
    exp_36(t36, WAD)
}

/// `x ^ y` for WAD base and exponent, before any error margin.
///
/// # Errors
///
/// [`AmmError::Overflow`] when the result or an intermediate exceeds its
/// range.
pub fn pow(x: u128, y: u128) -> Result<u128> {
    if y == 0 || x == WAD {
        return Ok(WAD);
    }
    if x == 0 {
        return Ok(0);
    }
    if y == WAD {
        return Ok(x);
    }
    let log = ln_ratio_36(x, WAD)?;
    let t = scale_signed(log, y, WAD)?;
    exp_36(t, WAD)
}

/// [`pow`] bumped up by its maximum error; never below the exact value.
///
/// # Errors
///
/// As [`pow`].
pub fn pow_up(x: u128, y: u128) -> Result<u128> {
    let raw = pow(x, y)?;
    let margin = mul_up(raw, MAX_POW_RELATIVE_ERROR)?
        .checked_add(1)
        .ok_or(AmmError::Overflow("pow margin"))?;
    raw.checked_add(margin)
        .ok_or(AmmError::Overflow("pow_up result"))
}

/// [`pow`] lowered by its maximum error; never above the exact value.
///
/// # Errors
///
/// As [`pow`].
pub fn pow_down(x: u128, y: u128) -> Result<u128> {
    let raw = pow(x, y)?;
    let margin = mul_up(raw, MAX_POW_RELATIVE_ERROR)?.saturating_add(1);
    Ok(raw.saturating_sub(margin))
}

/// Weighted geometric mean `Π values[i] ^ weights[i]` of plain integers,
/// with WAD weights summing to one, rounded down and reduced by the power
/// error margin.
///
/// # Errors
///
/// [`AmmError::InvalidQuantity`] if any value is zero,
/// [`AmmError::LengthMismatch`] if the slices differ in length.
pub fn weighted_geometric_mean(values: &[u128], weights: &[u128]) -> Result<u128> {
    if values.len() != weights.len() {
        return Err(AmmError::LengthMismatch("values and weights"));
    }
    let mut t: i128 = 0;
    for (&v, &w) in values.iter().zip(weights) {
        let log = ln_ratio_36(v, 1)?;
        t = t
            .checked_add(scale_signed(log, w, WAD)?)
            .ok_or(AmmError::Overflow("geometric mean exponent"))?;
    }
    let raw = exp_36(t, 1)?;
    let margin = mul_up(raw, MAX_POW_RELATIVE_ERROR)?.saturating_add(1);
    Ok(raw.saturating_sub(margin))
}

/// `v × num / den` for signed `v`, truncated toward zero.
fn scale_signed(v: i128, num: u128, den: u128) -> Result<i128> {
    let mag = mul_div(v.unsigned_abs(), num, den, Rounding::Down)?;
    let mag = i128::try_from(mag).map_err(|_| AmmError::Overflow("signed scale"))?;
    Ok(if v < 0 { -mag } else { mag })
}
