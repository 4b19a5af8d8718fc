//! Invariant evaluators, the liquidity accountant, the fee ledger and the
//! pool state machine that composes them.
//!
//! # Pool kinds
//!
//! | Feature | Evaluator | Style |
//! |---------|-----------|-------|
//! | `weighted` | [`WeightedInvariant`] | Balancer |
//! | `stable-swap` | [`StableSwapInvariant`] | Curve |
//!
//! [`PoolKind`] dispatches statically over whichever kinds are enabled.
//! [`Pool`] owns the mutable state and runs every operation as an atomic
//! transaction.

pub mod accountant;
mod fee_ledger;
mod flash;
mod pool;
mod pool_kind;
#[cfg(feature = "stable-swap")]
pub mod stable_swap;
#[cfg(feature = "weighted")]
pub mod weighted;

#[cfg(all(test, feature = "weighted", feature = "stable-swap"))]
mod proptest_properties;

pub use accountant::{compute_amounts_for_exit, compute_shares_for_join};
pub use fee_ledger::FeeLedger;
pub use flash::{FlashLoan, PendingSwap};
pub use pool::{FlowTotals, Pool, PoolSnapshot};
pub use pool_kind::PoolKind;
#[cfg(feature = "stable-swap")]
pub use stable_swap::StableSwapInvariant;
#[cfg(feature = "weighted")]
pub use weighted::WeightedInvariant;
