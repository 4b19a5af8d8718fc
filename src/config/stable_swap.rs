//! Configuration for StableSwap pools.

use serde::{Deserialize, Serialize};

use super::common::validate_assets;
use crate::domain::{AccountId, AssetId, FeeRate};
use crate::error::{AmmError, Result};

/// Largest admissible amplification coefficient.
pub const MAX_AMPLIFICATION: u32 = 10_000;

/// Blueprint for a Curve-style StableSwap pool of pegged assets.
///
/// | A | Curve |
/// |---|-------|
/// | 1 | close to constant product |
/// | 50–5 000 | flat near the peg |
/// | 10 000 | nearly constant sum |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableSwapConfig {
    assets: Vec<AssetId>,
    amplification: u32,
    fee: FeeRate,
    fee_authority: AccountId,
}

impl StableSwapConfig {
    /// Creates and validates a configuration.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        assets: Vec<AssetId>,
        amplification: u32,
        fee: FeeRate,
        fee_authority: AccountId,
    ) -> Result<Self> {
        let config = Self {
            assets,
            amplification,
            fee,
            fee_authority,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every configuration invariant.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] for bad asset lists or an
    /// amplification outside `1..=10_000`.
    pub fn validate(&self) -> Result<()> {
        validate_assets(&self.assets)?;
        if self.amplification == 0 || self.amplification > MAX_AMPLIFICATION {
            return Err(AmmError::InvalidConfiguration(
                "amplification must be in 1..=10000",
            ));
        }
        Ok(())
    }

    /// Assets in reserve order.
    #[must_use]
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Amplification coefficient `A`.
    #[must_use]
    pub const fn amplification(&self) -> u32 {
        self.amplification
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

    fn assets() -> Vec<AssetId> {
        vec![AssetId::from_index(1), AssetId::from_index(2), AssetId::from_index(3)]
    }

    #[test]
    fn amplification_bounds() {
        let auth = AccountId::from_index(7);
        assert!(StableSwapConfig::new(assets(), 0, FeeRate::ZERO, auth).is_err());
        assert!(StableSwapConfig::new(assets(), 1, FeeRate::ZERO, auth).is_ok());
        assert!(StableSwapConfig::new(assets(), 10_000, FeeRate::ZERO, auth).is_ok());
        assert!(StableSwapConfig::new(assets(), 10_001, FeeRate::ZERO, auth).is_err());
    }

    #[test]
    fn accessors() {
        let auth = AccountId::from_index(7);
        let Ok(cfg) = StableSwapConfig::new(assets(), 200, FeeRate::ZERO, auth) else {
            panic!("valid config");
        };
        assert_eq!(cfg.amplification(), 200);
        assert_eq!(cfg.assets().len(), 3);
        assert_eq!(cfg.fee_authority(), auth);
    }
}
