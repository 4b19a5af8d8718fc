//! Checks shared by every pool configuration.

use crate::domain::AssetId;
use crate::error::{AmmError, Result};

/// Fewest assets a pool may hold.
pub const MIN_ASSETS: usize = 2;

/// Most assets a pool may hold.
pub const MAX_ASSETS: usize = 8;

/// Asset count within `2..=8` and no asset listed twice.
pub(crate) fn validate_assets(assets: &[AssetId]) -> Result<()> {
    if assets.len() < MIN_ASSETS {
        return Err(AmmError::InvalidConfiguration("at least 2 assets are required"));
    }
    if assets.len() > MAX_ASSETS {
        return Err(AmmError::InvalidConfiguration("at most 8 assets are supported"));
    }
    // O(n²) is fine for eight assets.
    let mut iter = assets.iter();
    while let Some(asset) = iter.next() {
        if iter.clone().any(|other| other == asset) {
            return Err(AmmError::InvalidConfiguration("duplicate asset ids are not allowed"));
        }
    }
    Ok(())
}
