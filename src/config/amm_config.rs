//! Top-level pool configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{StableSwapConfig, WeightedConfig};
use crate::domain::{AccountId, AssetId, FeeRate};
use crate::error::{AmmError, Result};

/// Declarative blueprint for any pool the crate can build.
///
/// Serialized with a `kind` tag:
///
/// ```json
/// { "kind": "stable_swap", "assets": ["0x…", "0x…"], "amplification": 100,
///   "fee": 4, "fee_authority": "0x…" }
/// ```
///
/// Pass it to [`DefaultPoolFactory::create`](crate::factory::DefaultPoolFactory::create)
/// to obtain a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmmConfig {
    /// Weighted pool (Balancer style).
    Weighted(WeightedConfig),
    /// StableSwap pool (Curve style).
    StableSwap(StableSwapConfig),
}

impl AmmConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] for malformed JSON, plus any
    /// error from [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "rejected pool configuration");
            AmmError::InvalidConfiguration("malformed pool configuration json")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to JSON.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|_| AmmError::InvalidConfiguration("configuration is not serializable"))
    }

    /// Delegates to the variant's `validate()`.
    ///
    /// # Errors
    ///
    /// Whatever the inner configuration reports.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Weighted(cfg) => cfg.validate(),
            Self::StableSwap(cfg) => cfg.validate(),
        }
    }

    /// Assets in reserve order.
    #[must_use]
    pub fn assets(&self) -> &[AssetId] {
        match self {
            Self::Weighted(cfg) => cfg.assets(),
            Self::StableSwap(cfg) => cfg.assets(),
        }
    }

    /// Swap fee.
    #[must_use]
    pub const fn fee(&self) -> FeeRate {
        match self {
            Self::Weighted(cfg) => cfg.fee(),
            Self::StableSwap(cfg) => cfg.fee(),
        }
    }

    /// Account allowed to collect fees.
    #[must_use]
    pub const fn fee_authority(&self) -> AccountId {
        match self {
            Self::Weighted(cfg) => cfg.fee_authority(),
            Self::StableSwap(cfg) => cfg.fee_authority(),
        }
    }

    /// `true` for [`Weighted`](Self::Weighted).
    #[must_use]
    pub const fn is_weighted(&self) -> bool {
        matches!(self, Self::Weighted(_))
    }

    /// `true` for [`StableSwap`](Self::StableSwap).
    #[must_use]
    pub const fn is_stable_swap(&self) -> bool {
        matches!(self, Self::StableSwap(_))
    }
}

impl core::fmt::Display for AmmConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Weighted(_) => write!(f, "Weighted"),
            Self::StableSwap(_) => write!(f, "StableSwap"),
        }
    }
}
