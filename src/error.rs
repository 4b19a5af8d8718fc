//! Unified error types for the AMM core.
//!
//! Every fallible operation in the crate returns [`AmmError`].  Variants
//! fall into four classes (see [`ErrorClass`]):
//!
//! | Class | Examples | Caller action |
//! |-------|----------|---------------|
//! | Validation | zero amounts, unknown assets, mismatched lengths | fix input, resubmit |
//! | Economic | slippage, deadline, insufficient shares | retry with new parameters |
//! | Invariant violation | drained reserve, shrinking invariant | abort, report |
//! | Arithmetic | overflow, non-convergence | abort, report |
//!
//! No operation mutates state before returning an error.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Broad category of an [`AmmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed input, rejected before any computation.
    Validation,
    /// Well-formed request that the current pool state cannot honour.
    Economic,
    /// A computed state would break a pool invariant.
    InvariantViolation,
    /// Overflow, underflow, division by zero or numeric non-convergence.
    Arithmetic,
}

/// Errors produced by pool math, accounting and state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AmmError {
    // -- validation ---------------------------------------------------------
    /// An amount or share quantity is zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// An asset id or index does not belong to the pool.
    #[error("invalid asset: {0}")]
    InvalidAsset(&'static str),

    /// Per-asset vectors disagree in length with the pool.
    #[error("length mismatch: {0}")]
    LengthMismatch(&'static str),

    /// Fee rate outside `[0, 100%)`.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Weight missing, too small, or weights not summing to 100%.
    #[error("invalid weight: {0}")]
    InvalidWeight(&'static str),

    /// Any other malformed pool configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    // -- economic -----------------------------------------------------------
    /// Result violates the caller's `min_amount_out` / `max_amount_in` /
    /// `min_shares_out` bound.
    #[error("slippage exceeded: {0}")]
    SlippageExceeded(&'static str),

    /// Reserves cannot satisfy the request.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Trade is larger than the pool kind allows in a single swap.
    #[error("swap limit exceeded: {0}")]
    SwapLimitExceeded(&'static str),

    /// Caller tried to burn or move more shares than it owns.
    #[error("insufficient shares")]
    InsufficientShares,

    /// Request evaluated after its deadline.
    #[error("deadline expired")]
    DeadlineExpired,

    /// Exit attempted on a pool with no outstanding shares.
    #[error("pool has no outstanding shares")]
    EmptyPool,

    /// Swap attempted before the bootstrap join.
    #[error("pool is not initialized")]
    PoolNotInitialized,

    /// Caller lacks the role required by the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// A two-phase swap is open; the pool accepts no other mutation.
    #[error("a swap is awaiting settlement")]
    SettlementPending,

    /// `settle_swap` / `abort_swap` called with nothing open.
    #[error("no swap is awaiting settlement")]
    NoPendingSwap,

    /// Settlement repaid less than the quoted input.
    #[error("repayment below the quoted input")]
    RepaymentShortfall,

    // -- invariant ----------------------------------------------------------
    /// A computed update would break a pool invariant.
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),

    // -- arithmetic ---------------------------------------------------------
    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An iterative solver did not converge.
    #[error("newton-raphson did not converge: {0}")]
    NewtonRaphsonNonConvergence(&'static str),
}

impl AmmError {
    /// Returns the [`ErrorClass`] of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidQuantity(_)
            | Self::InvalidAsset(_)
            | Self::LengthMismatch(_)
            | Self::InvalidFee(_)
            | Self::InvalidWeight(_)
            | Self::InvalidConfiguration(_) => ErrorClass::Validation,
            Self::SlippageExceeded(_)
            | Self::InsufficientLiquidity
            | Self::SwapLimitExceeded(_)
            | Self::InsufficientShares
            | Self::DeadlineExpired
            | Self::EmptyPool
            | Self::PoolNotInitialized
            | Self::Unauthorized(_)
            | Self::SettlementPending
            | Self::NoPendingSwap
            | Self::RepaymentShortfall => ErrorClass::Economic,
            Self::InvariantViolation(_) => ErrorClass::InvariantViolation,
            Self::Overflow(_)
            | Self::Underflow(_)
            | Self::DivisionByZero
            | Self::NewtonRaphsonNonConvergence(_) => ErrorClass::Arithmetic,
        }
    }

    /// `true` for validation and economic errors: the caller may correct
    /// the request and resubmit.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Validation | ErrorClass::Economic
        )
    }
}
