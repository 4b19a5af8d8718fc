//! Construction of pool components from their configuration.
//!
//! Each invariant implementation builds itself from its own config struct,
//! so the factory can dispatch on [`AmmConfig`](crate::config::AmmConfig)
//! without trait objects:
//!
//! ```text
//! AmmConfig::Weighted(cfg)   => WeightedInvariant::from_config(&cfg)
//! AmmConfig::StableSwap(cfg) => StableSwapInvariant::from_config(&cfg)
//! ```
//!
//! There is no blanket implementation; every pairing is explicit.

use crate::error::Result;

/// Builds `Self` from a configuration of type `C`.
///
/// Implementations validate the configuration; a successfully built value
/// is ready for use.
pub trait FromConfig<C> {
    /// Creates an instance from `config`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`](crate::error::AmmError::InvalidConfiguration)
    /// or a more specific validation variant.
    fn from_config(config: &C) -> Result<Self>
    where
        Self: Sized;
}
