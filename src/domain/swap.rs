//! Swap requests and quotes.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{AccountId, Amount, AssetId, Timestamp};

/// Which side of a swap the caller fixes, together with its slippage bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapKind {
    /// Spend exactly `amount_in`; receive at least `min_amount_out`.
    #[serde(rename_all = "camelCase")]
    ExactIn {
        /// Gross input, fee included.
        amount_in: Amount,
        /// Smallest acceptable output.
        min_amount_out: Amount,
    },
    /// Receive exactly `amount_out`; pay at most `max_amount_in`.
    #[serde(rename_all = "camelCase")]
    ExactOut {
        /// Requested output.
        amount_out: Amount,
        /// Largest acceptable gross input.
        max_amount_in: Amount,
    },
}

impl fmt::Display for SwapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn { amount_in, .. } => write!(f, "ExactIn({amount_in})"),
            Self::ExactOut { amount_out, .. } => write!(f, "ExactOut({amount_out})"),
        }
    }
}

/// A caller's swap intent.
///
/// # Examples
///
/// ```
/// use weighted_amm_core::domain::{AccountId, Amount, AssetId, SwapRequest, Timestamp};
///
/// let req = SwapRequest::exact_in(AssetId::from_index(1), AssetId::from_index(2), Amount::new(100))
///     .with_min_amount_out(Amount::new(85))
///     .with_deadline(Timestamp::new(1_000))
///     .with_recipient(AccountId::from_index(9));
/// assert_eq!(req.recipient, Some(AccountId::from_index(9)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    /// Asset paid in.
    pub token_in: AssetId,
    /// Asset paid out.
    pub token_out: AssetId,
    /// Fixed side and slippage bound.
    pub kind: SwapKind,
    /// Receiver of the output; `None` means the caller.
    pub recipient: Option<AccountId>,
    /// Last instant at which the request may execute.
    pub deadline: Timestamp,
}

impl SwapRequest {
    /// Exact-input request with no slippage bound and no deadline.
    #[must_use]
    pub const fn exact_in(token_in: AssetId, token_out: AssetId, amount_in: Amount) -> Self {
        Self {
            token_in,
            token_out,
            kind: SwapKind::ExactIn {
                amount_in,
                min_amount_out: Amount::ZERO,
            },
            recipient: None,
            deadline: Timestamp::MAX,
        }
    }

    /// Exact-output request with no slippage bound and no deadline.
    #[must_use]
    pub const fn exact_out(token_in: AssetId, token_out: AssetId, amount_out: Amount) -> Self {
        Self {
            token_in,
            token_out,
            kind: SwapKind::ExactOut {
                amount_out,
                max_amount_in: Amount::MAX,
            },
            recipient: None,
            deadline: Timestamp::MAX,
        }
    }

    /// Sets `min_amount_out`; ignored for exact-out requests.
    #[must_use]
    pub const fn with_min_amount_out(mut self, min: Amount) -> Self {
        if let SwapKind::ExactIn { amount_in, .. } = self.kind {
            self.kind = SwapKind::ExactIn {
                amount_in,
                min_amount_out: min,
            };
        }
        self
    }

    /// Sets `max_amount_in`; ignored for exact-in requests.
    #[must_use]
    pub const fn with_max_amount_in(mut self, max: Amount) -> Self {
        if let SwapKind::ExactOut { amount_out, .. } = self.kind {
            self.kind = SwapKind::ExactOut {
                amount_out,
                max_amount_in: max,
            };
        }
        self
    }

    /// Sets the recipient.
    #[must_use]
    pub const fn with_recipient(mut self, recipient: AccountId) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Priced swap: what goes in, what comes out, and the fee withheld.
///
/// `amount_in` is gross; `amount_in - fee` is what enters the reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    /// Reserve index of the input asset.
    pub index_in: usize,
    /// Reserve index of the output asset.
    pub index_out: usize,
    /// Gross input, fee included.
    pub amount_in: Amount,
    /// Output paid to the recipient.
    pub amount_out: Amount,
    /// Fee charged on the input, routed to the fee ledger.
    pub fee: Amount,
}

impl SwapQuote {
    /// Input that reaches the reserves.
    #[must_use]
    pub fn net_in(&self) -> Amount {
        Amount::new(self.amount_in.get().saturating_sub(self.fee.get()))
    }
}
