//! Deterministic integer arithmetic for pool math.
//!
//! - [`CheckedArithmetic`]: `Result`-returning ops on quantity newtypes.
//! - [`div_round`] / [`mul_div`]: division with explicit rounding and
//!   256-bit intermediates.
//! - [`fixed_point`]: 18-decimal fixed point (`WAD`).
//! - [`log_exp`]: `ln`, `exp` and `pow` with a documented error bound.
//! - [`stable`]: StableSwap `D` / `y` solvers.
//!
//! Nothing here uses floating point.

mod checked;
pub mod fixed_point;
pub mod log_exp;
mod rounding;
pub mod stable;
mod wide;

pub use checked::CheckedArithmetic;
pub use fixed_point::WAD;
pub use log_exp::{MAX_POW_RELATIVE_ERROR, pow, pow_down, pow_up, weighted_geometric_mean};
pub use rounding::{div_round, mul_div, sqrt_product};
pub(crate) use wide::U256;
