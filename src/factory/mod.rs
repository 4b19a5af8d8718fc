//! Pool instantiation via the factory pattern.
//!
//! The [`DefaultPoolFactory`] creates empty pools from [`AmmConfig`]
//! values, validating the configuration and dispatching to the evaluator
//! constructor of the configured kind.
//!
//! # Usage
//!
//! ```rust
//! use weighted_amm_core::config::{AmmConfig, WeightedConfig};
//! use weighted_amm_core::domain::{AccountId, AssetId, FeeRate};
//! use weighted_amm_core::factory::DefaultPoolFactory;
//!
//! let Ok(fee) = FeeRate::new(30) else { panic!() };
//! let Ok(cfg) = WeightedConfig::equal_weights(
//!     vec![AssetId::from_index(1), AssetId::from_index(2)],
//!     fee,
//!     AccountId::from_index(9),
//! ) else { panic!() };
//!
//! let Ok(pool) = DefaultPoolFactory::create(&AmmConfig::Weighted(cfg)) else { panic!() };
//! assert_eq!(pool.fee(), fee);
//! ```
//!
//! # Feature Gating
//!
//! Each pool kind is gated behind its feature flag.  A config naming a
//! kind whose feature is disabled yields
//! [`AmmError::InvalidConfiguration`].
//!
//! [`AmmConfig`]: crate::config::AmmConfig
//! [`AmmError::InvalidConfiguration`]: crate::error::AmmError::InvalidConfiguration

mod default_factory;

pub use default_factory::DefaultPoolFactory;
