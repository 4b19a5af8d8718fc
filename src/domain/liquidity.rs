//! Join / exit requests and their quotes.

use serde::{Deserialize, Serialize};

use super::{AccountId, Amount, Shares, Timestamp};

/// Deposit into a pool.
///
/// `amounts_in` is index-aligned with the pool's assets.  A bootstrap join
/// supplies every asset; a later join either supplies every asset
/// (balanced) or exactly one (single-asset).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Per-asset deposit.
    pub amounts_in: Vec<Amount>,
    /// Smallest acceptable mint.
    pub min_shares_out: Shares,
    /// Last instant at which the request may execute.
    pub deadline: Timestamp,
}

impl JoinRequest {
    /// Join with no slippage bound and no deadline.
    #[must_use]
    pub fn new(amounts_in: Vec<Amount>) -> Self {
        Self {
            amounts_in,
            min_shares_out: Shares::ZERO,
            deadline: Timestamp::MAX,
        }
    }

    /// Sets `min_shares_out`.
    #[must_use]
    pub fn with_min_shares_out(mut self, min: Shares) -> Self {
        self.min_shares_out = min;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Redemption of shares for a proportional slice of every reserve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitRequest {
    /// Shares to burn.
    pub shares: Shares,
    /// Per-asset lower bounds; empty means unbounded.
    pub min_amounts_out: Vec<Amount>,
    /// Last instant at which the request may execute.
    pub deadline: Timestamp,
}

impl ExitRequest {
    /// Exit with no slippage bounds and no deadline.
    #[must_use]
    pub const fn new(shares: Shares) -> Self {
        Self {
            shares,
            min_amounts_out: Vec::new(),
            deadline: Timestamp::MAX,
        }
    }

    /// Sets per-asset lower bounds.
    #[must_use]
    pub fn with_min_amounts_out(mut self, mins: Vec<Amount>) -> Self {
        self.min_amounts_out = mins;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Outcome of pricing a join.
///
/// For every asset `amounts_used[i] + refunds[i] == amounts_in[i]`, and
/// `fees[i]` is the part of `amounts_used[i]` routed to the fee ledger
/// instead of the reserves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinQuote {
    /// Shares minted.
    pub shares: Shares,
    /// Deposit retained by the pool, fees included.
    pub amounts_used: Vec<Amount>,
    /// Deposit handed back to the caller.
    pub refunds: Vec<Amount>,
    /// Swap fees charged on the unbalanced part of a single-asset join.
    pub fees: Vec<Amount>,
}

/// Outcome of pricing an exit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitQuote {
    /// Shares burned.
    pub shares: Shares,
    /// Per-asset payout, rounded down.
    pub amounts_out: Vec<Amount>,
}

/// One owner's stake in a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiquidityPosition {
    /// Holder of the shares.
    pub owner: AccountId,
    /// Shares held.
    pub shares: Shares,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_builder_defaults() {
        let req = JoinRequest::new(vec![Amount::new(1), Amount::new(2)])
            .with_min_shares_out(Shares::new(5));
        assert_eq!(req.min_shares_out, Shares::new(5));
        assert_eq!(req.deadline, Timestamp::MAX);
    }

    #[test]
    fn exit_builder_defaults() {
        let req = ExitRequest::new(Shares::new(10)).with_deadline(Timestamp::new(3));
        assert!(req.min_amounts_out.is_empty());
        assert_eq!(req.deadline, Timestamp::new(3));
    }
}
