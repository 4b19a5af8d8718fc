//! Configuration for weighted pools.

use serde::{Deserialize, Serialize};

use super::common::validate_assets;
use crate::domain::{AccountId, AssetId, BPS_DENOMINATOR, FeeRate, Weight};
use crate::error::{AmmError, Result};

/// Blueprint for a weighted pool holding 2–8 assets.
///
/// # Invariant
///
/// ```text
/// Π Bᵢ ^ Wᵢ = k
/// ```
///
/// Weights are index-aligned with `assets`, each at least 1 %, and sum to
/// 10 000 bp.  An empty `weights` list leaves them open: the bootstrap join
/// fixes them from the ratio of its deposit.
///
/// # Examples
///
/// ```
/// use weighted_amm_core::config::WeightedConfig;
/// use weighted_amm_core::domain::{AccountId, AssetId, FeeRate, Weight};
///
/// let (Ok(fee), Ok(w80), Ok(w20)) = (FeeRate::new(30), Weight::new(8_000), Weight::new(2_000)) else {
///     panic!()
/// };
/// let cfg = WeightedConfig::new(
///     vec![AssetId::from_index(1), AssetId::from_index(2)],
///     vec![w80, w20],
///     fee,
///     AccountId::from_index(9),
/// );
/// assert!(cfg.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedConfig {
    assets: Vec<AssetId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    weights: Vec<Weight>,
    fee: FeeRate,
    fee_authority: AccountId,
}

impl WeightedConfig {
    /// Creates and validates a configuration.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        assets: Vec<AssetId>,
        weights: Vec<Weight>,
        fee: FeeRate,
        fee_authority: AccountId,
    ) -> Result<Self> {
        let config = Self {
            assets,
            weights,
            fee,
            fee_authority,
        };
        config.validate()?;
        Ok(config)
    }

    /// Equal-weight configuration; the classic 50/50 pool for two assets.
    ///
    /// When 10 000 bp does not divide evenly the first weights carry the
    /// remainder (3334/3333/3333); the pool still prices every pair as
    /// equally weighted.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn equal_weights(assets: Vec<AssetId>, fee: FeeRate, fee_authority: AccountId) -> Result<Self> {
        validate_assets(&assets)?;
        let weights = Weight::equal(assets.len())?;
        Self::new(assets, weights, fee, fee_authority)
    }

    /// Configuration whose weights are fixed by the bootstrap deposit.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn deposit_weighted(assets: Vec<AssetId>, fee: FeeRate, fee_authority: AccountId) -> Result<Self> {
        Self::new(assets, Vec::new(), fee, fee_authority)
    }

    /// Checks every configuration invariant.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for fewer than 2 or more than 8
    ///   assets, or duplicate asset ids.
    /// - [`AmmError::LengthMismatch`] if `weights` is non-empty and its
    ///   length differs from `assets`.
    /// - [`AmmError::InvalidWeight`] if the weights do not sum to 10 000 bp.
    pub fn validate(&self) -> Result<()> {
        validate_assets(&self.assets)?;
        if self.weights.is_empty() {
            Weight::equal(self.assets.len())?;
            return Ok(());
        }
        if self.weights.len() != self.assets.len() {
            return Err(AmmError::LengthMismatch("weights and assets must have equal length"));
        }
        let sum: u32 = self.weights.iter().map(Weight::bps).sum();
        if sum != BPS_DENOMINATOR {
            return Err(AmmError::InvalidWeight("weights must sum to exactly 10000 bp"));
        }
        Ok(())
    }

    /// Assets in reserve order.
    #[must_use]
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Configured weights; empty when the bootstrap deposit decides them.
    #[must_use]
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Swap fee.
    #[must_use]
    pub const fn fee(&self) -> FeeRate {
        self.fee
    }

    /// Account allowed to collect fees.
    #[must_use]
    pub const fn fee_authority(&self) -> AccountId {
        self.fee_authority
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn w(bps: u32) -> Weight {
        let Ok(w) = Weight::new(bps) else {
            panic!("valid weight");
        };
        w
    }

    fn assets(n: u8) -> Vec<AssetId> {
        (1..=n).map(AssetId::from_index).collect()
    }

    #[test]
    fn accepts_eighty_twenty() {
        let cfg = WeightedConfig::new(assets(2), vec![w(8_000), w(2_000)], FeeRate::ZERO, AccountId::from_index(1));
        assert!(cfg.is_ok());
    }

    #[test]
    fn rejects_bad_sum() {
        let cfg = WeightedConfig::new(assets(2), vec![w(5_000), w(4_000)], FeeRate::ZERO, AccountId::from_index(1));
        assert_eq!(cfg, Err(AmmError::InvalidWeight("weights must sum to exactly 10000 bp")));
    }

    #[test]
    fn rejects_length_mismatch() {
        let cfg = WeightedConfig::new(assets(3), vec![w(5_000), w(5_000)], FeeRate::ZERO, AccountId::from_index(1));
        assert!(matches!(cfg, Err(AmmError::LengthMismatch(_))));
    }

    #[test]
    fn equal_weights_are_explicit() {
        let Ok(cfg) = WeightedConfig::equal_weights(assets(4), FeeRate::ZERO, AccountId::from_index(1)) else {
            panic!("valid config");
        };
        assert_eq!(cfg.weights().len(), 4);
        assert!(cfg.weights().iter().all(|x| x.bps() == 2_500));
    }

    #[test]
    fn deposit_weighted_leaves_weights_open() {
        let Ok(cfg) = WeightedConfig::deposit_weighted(assets(3), FeeRate::ZERO, AccountId::from_index(1)) else {
            panic!("valid config");
        };
        assert!(cfg.weights().is_empty());
        assert!(WeightedConfig::deposit_weighted(assets(9), FeeRate::ZERO, AccountId::from_index(1)).is_err());
    }

    #[test]
    fn deserializes_without_weights() {
        let json = format!(
            r#"{{"assets":["{}","{}"],"fee":30,"fee_authority":"{}"}}"#,
            AssetId::from_index(1),
            AssetId::from_index(2),
            AccountId::from_index(3)
        );
        let Ok(cfg) = serde_json::from_str::<WeightedConfig>(&json) else {
            panic!("deserialize failed");
        };
        assert_eq!(cfg.validate(), Ok(()));
        assert!(cfg.weights().is_empty());
        assert_eq!(cfg.fee().bps(), 30);
    }
}
