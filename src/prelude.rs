//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use weighted_amm_core::prelude::*;
//! ```

pub use crate::config::{AmmConfig, StableSwapConfig, WeightedConfig};
pub use crate::domain::{
    AccountId, Amount, AssetId, ExitQuote, ExitRequest, FeeRate, JoinQuote, JoinRequest, PoolEvent,
    PoolId, Price, Rounding, Shares, SwapKind, SwapQuote, SwapRequest, Timestamp, TxContext, Weight,
};
pub use crate::error::{AmmError, ErrorClass, Result};
pub use crate::factory::DefaultPoolFactory;
pub use crate::math::CheckedArithmetic;
pub use crate::pools::{FlashLoan, Pool, PoolKind, PoolSnapshot};
pub use crate::service::{PoolRegistry, SharedPool};
pub use crate::traits::{FromConfig, InvariantEvaluator};
