//! Default pool factory implementation.

use tracing::info;

use crate::config::AmmConfig;
use crate::domain::PoolId;
use crate::error::Result;
use crate::pools::Pool;
use crate::traits::FromConfig;

/// Stateless factory turning an [`AmmConfig`] into an empty [`Pool`].
///
/// The factory validates the configuration, builds the kind's invariant
/// evaluator through [`FromConfig`] and wraps it in a pool with zero
/// reserves.  The first join bootstraps it.
///
/// # Example
///
/// ```rust
/// use weighted_amm_core::config::{AmmConfig, StableSwapConfig};
/// use weighted_amm_core::domain::{AccountId, AssetId, FeeRate, PoolId};
/// use weighted_amm_core::factory::DefaultPoolFactory;
///
/// let Ok(fee) = FeeRate::new(4) else { panic!() };
/// let Ok(cfg) = StableSwapConfig::new(
///     vec![AssetId::from_index(1), AssetId::from_index(2)],
///     100,
///     fee,
///     AccountId::from_index(9),
/// ) else { panic!() };
///
/// let Ok(pool) = DefaultPoolFactory::create_with_id(PoolId::new(7), &AmmConfig::StableSwap(cfg)) else { panic!() };
/// assert_eq!(pool.id(), PoolId::new(7));
/// assert!(!pool.is_initialized());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultPoolFactory;

impl DefaultPoolFactory {
    /// Creates a pool from `config`, with the default id.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`](crate::error::AmmError::InvalidConfiguration)
    ///   if the configuration is invalid or names a pool kind whose feature
    ///   is not enabled.
    /// - Any other validation error from the configuration.
    pub fn create(config: &AmmConfig) -> Result<Pool> {
        Self::create_with_id(PoolId::default(), config)
    }

    /// Creates a pool from `config` under `id`.
    ///
    /// # Errors
    ///
    /// As [`create`](Self::create).
    pub fn create_with_id(id: PoolId, config: &AmmConfig) -> Result<Pool> {
        let pool = Pool::from_config(config)?.with_id(id);
        info!(pool = %id, kind = pool.kind().name(), assets = pool.assets().len(), "pool created");
        Ok(pool)
    }

    /// Parses a JSON configuration and creates the pool.
    ///
    /// # Errors
    ///
    /// As [`AmmConfig::from_json`] and [`create`](Self::create).
    pub fn create_from_json(id: PoolId, json: &str) -> Result<Pool> {
        Self::create_with_id(id, &AmmConfig::from_json(json)?)
    }
}
