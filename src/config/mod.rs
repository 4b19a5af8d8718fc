//! Pool configuration.
//!
//! [`AmmConfig`] is the declarative blueprint for a pool: which invariant,
//! which assets, and the kind's parameters (weights or amplification),
//! fee and fee authority.  Per-kind structs validate themselves; the
//! factory turns a valid config into a pool.

mod amm_config;
mod common;
mod stable_swap;
mod weighted;

pub use amm_config::AmmConfig;
pub use common::{MAX_ASSETS, MIN_ASSETS};
pub use stable_swap::{MAX_AMPLIFICATION, StableSwapConfig};
pub use weighted::WeightedConfig;
