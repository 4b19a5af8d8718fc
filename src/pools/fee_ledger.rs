//! Fee Ledger: swap fees held apart from the tradable reserves.
//!
//! Pricing never reads the ledger.  Fees only ever grow until the fee
//! authority collects them, at which point they move to the collected
//! totals used by reconciliation.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;

/// Per-asset fee balances of one pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeLedger {
    authority: AccountId,
    accrued: Vec<Amount>,
    collected: Vec<Amount>,
}

impl FeeLedger {
    /// Empty ledger for `asset_count` assets.
    #[must_use]
    pub fn new(asset_count: usize, authority: AccountId) -> Self {
        Self {
            authority,
            accrued: vec![Amount::ZERO; asset_count],
            collected: vec![Amount::ZERO; asset_count],
        }
    }

    /// Account allowed to collect fees.
    #[must_use]
    pub const fn authority(&self) -> AccountId {
        self.authority
    }

    /// Fees accrued since the last collection.
    #[must_use]
    pub fn accrued(&self) -> &[Amount] {
        &self.accrued
    }

    /// Fees collected over the pool's lifetime.
    #[must_use]
    pub fn collected(&self) -> &[Amount] {
        &self.collected
    }

    /// Adds `amount` to asset `idx`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidAsset`] for a bad index, [`AmmError::Overflow`].
    pub fn record_fee(&mut self, idx: usize, amount: Amount) -> Result<()> {
        let slot = self
            .accrued
            .get_mut(idx)
            .ok_or(AmmError::InvalidAsset("fee asset index out of range"))?;
        *slot = slot.safe_add(&amount)?;
        Ok(())
    }

    /// Adds a whole per-asset vector of fees.
    ///
    /// # Errors
    ///
    /// As [`record_fee`](Self::record_fee), plus
    /// [`AmmError::LengthMismatch`].
    pub fn record_fees(&mut self, fees: &[Amount]) -> Result<()> {
        if fees.len() != self.accrued.len() {
            return Err(AmmError::LengthMismatch("fees do not match the pool's assets"));
        }
        for (idx, fee) in fees.iter().enumerate() {
            if !fee.is_zero() {
                self.record_fee(idx, *fee)?;
            }
        }
        Ok(())
    }

    /// Moves every accrued fee out of the ledger and returns the amounts.
    ///
    /// # Errors
    ///
    /// [`AmmError::Unauthorized`] unless `caller` is the fee authority.
    pub fn collect(&mut self, caller: AccountId) -> Result<Vec<Amount>> {
        self.ensure_authority(caller)?;
        let mut collected = self.collected.clone();
        for (total, fee) in collected.iter_mut().zip(&self.accrued) {
            *total = total.safe_add(fee)?;
        }
        self.collected = collected;
        let n = self.accrued.len();
        Ok(std::mem::replace(&mut self.accrued, vec![Amount::ZERO; n]))
    }

    /// Hands the fee authority to `next`, returning the previous holder.
    ///
    /// # Errors
    ///
    /// [`AmmError::Unauthorized`] unless `caller` is the fee authority.
    pub fn set_authority(&mut self, caller: AccountId, next: AccountId) -> Result<AccountId> {
        self.ensure_authority(caller)?;
        Ok(std::mem::replace(&mut self.authority, next))
    }

    fn ensure_authority(&self, caller: AccountId) -> Result<()> {
        if caller != self.authority {
            return Err(AmmError::Unauthorized("caller is not the fee authority"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const ADMIN: AccountId = AccountId::from_index(1);
    const EVE: AccountId = AccountId::from_index(2);

    #[test]
    fn fees_accumulate_and_collect() {
        let mut ledger = FeeLedger::new(2, ADMIN);
        assert!(ledger.record_fee(0, Amount::new(3)).is_ok());
        assert!(ledger.record_fee(0, Amount::new(4)).is_ok());
        assert!(ledger.record_fees(&[Amount::new(1), Amount::new(2)]).is_ok());
        assert_eq!(ledger.accrued(), &[Amount::new(8), Amount::new(2)]);

        let Ok(out) = ledger.collect(ADMIN) else {
            panic!("collect");
        };
        assert_eq!(out, vec![Amount::new(8), Amount::new(2)]);
        assert_eq!(ledger.accrued(), &[Amount::ZERO, Amount::ZERO]);
        assert_eq!(ledger.collected(), &[Amount::new(8), Amount::new(2)]);
    }

    #[test]
    fn only_authority_collects() {
        let mut ledger = FeeLedger::new(2, ADMIN);
        assert!(ledger.record_fee(1, Amount::new(5)).is_ok());
        assert!(matches!(ledger.collect(EVE), Err(AmmError::Unauthorized(_))));
        assert_eq!(ledger.accrued(), &[Amount::ZERO, Amount::new(5)]);
    }

    #[test]
    fn authority_hand_over() {
        let mut ledger = FeeLedger::new(2, ADMIN);
        assert!(ledger.set_authority(EVE, EVE).is_err());
        assert_eq!(ledger.set_authority(ADMIN, EVE), Ok(ADMIN));
        assert_eq!(ledger.authority(), EVE);
        assert!(ledger.collect(ADMIN).is_err());
    }

    #[test]
    fn bad_index_and_overflow() {
        let mut ledger = FeeLedger::new(2, ADMIN);
        assert!(matches!(ledger.record_fee(2, Amount::new(1)), Err(AmmError::InvalidAsset(_))));
        assert!(ledger.record_fee(0, Amount::MAX).is_ok());
        assert!(matches!(ledger.record_fee(0, Amount::new(1)), Err(AmmError::Overflow(_))));
        assert!(matches!(ledger.record_fees(&[Amount::new(1)]), Err(AmmError::LengthMismatch(_))));
    }
}
