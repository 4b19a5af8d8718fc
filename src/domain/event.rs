//! Pool event journal records.
//!
//! Events are plain data serialized with a stable JSON shape (`event`
//! tag, camelCase fields) so downstream indexers can consume them without
//! linking this crate.

use serde::Serialize;

use super::{AccountId, Amount, AssetId, Shares};

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "event")]
pub enum PoolEvent {
    /// A swap executed.
    #[serde(rename_all = "camelCase")]
    Swapped {
        /// Caller that paid the input.
        sender: AccountId,
        /// Receiver of the output.
        recipient: AccountId,
        /// Asset paid in.
        token_in: AssetId,
        /// Asset paid out.
        token_out: AssetId,
        /// Gross input.
        amount_in: Amount,
        /// Output paid.
        amount_out: Amount,
        /// Fee routed to the ledger.
        fee_amount: Amount,
    },
    /// Liquidity added.
    #[serde(rename_all = "camelCase")]
    Joined {
        /// Receiver of the minted shares.
        owner: AccountId,
        /// Shares minted.
        shares_minted: Shares,
        /// Deposit retained, fees included.
        amounts_in: Vec<Amount>,
        /// Deposit returned unused.
        refunds: Vec<Amount>,
    },
    /// Liquidity removed.
    #[serde(rename_all = "camelCase")]
    Exited {
        /// Holder whose shares were burned.
        owner: AccountId,
        /// Shares burned.
        shares_burned: Shares,
        /// Per-asset payout.
        amounts_out: Vec<Amount>,
    },
    /// Accumulated fees handed to a recipient.
    #[serde(rename_all = "camelCase")]
    FeesCollected {
        /// Receiver of the fees.
        recipient: AccountId,
        /// Per-asset amounts collected.
        amounts: Vec<Amount>,
    },
    /// The fee authority role changed hands.
    #[serde(rename_all = "camelCase")]
    FeeAuthorityChanged {
        /// Previous authority.
        previous: AccountId,
        /// New authority.
        current: AccountId,
    },
    /// Shares moved between owners.
    #[serde(rename_all = "camelCase")]
    SharesTransferred {
        /// Sender.
        from: AccountId,
        /// Receiver.
        to: AccountId,
        /// Shares moved.
        shares: Shares,
    },
    /// A two-phase swap released its output and awaits repayment.
    #[serde(rename_all = "camelCase")]
    FlashSwapOpened {
        /// Ticket identifying the open swap.
        ticket: u64,
        /// Initiator.
        sender: AccountId,
        /// Asset owed.
        token_in: AssetId,
        /// Asset released.
        token_out: AssetId,
        /// Gross amount owed.
        amount_owed: Amount,
        /// Output released.
        amount_out: Amount,
    },
    /// A two-phase swap was repaid and finalized.
    #[serde(rename_all = "camelCase")]
    FlashSwapSettled {
        /// Ticket of the settled swap.
        ticket: u64,
        /// Amount repaid.
        amount_repaid: Amount,
        /// Fee routed to the ledger.
        fee_amount: Amount,
    },
    /// A two-phase swap was rolled back.
    #[serde(rename_all = "camelCase")]
    FlashSwapAborted {
        /// Ticket of the aborted swap.
        ticket: u64,
    },
}

impl PoolEvent {
    /// Short event name, as used in the JSON `event` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Swapped { .. } => "Swapped",
            Self::Joined { .. } => "Joined",
            Self::Exited { .. } => "Exited",
            Self::FeesCollected { .. } => "FeesCollected",
            Self::FeeAuthorityChanged { .. } => "FeeAuthorityChanged",
            Self::SharesTransferred { .. } => "SharesTransferred",
            Self::FlashSwapOpened { .. } => "FlashSwapOpened",
            Self::FlashSwapSettled { .. } => "FlashSwapSettled",
            Self::FlashSwapAborted { .. } => "FlashSwapAborted",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn swapped_json_shape() {
        let ev = PoolEvent::Swapped {
            sender: AccountId::from_index(1),
            recipient: AccountId::from_index(1),
            token_in: AssetId::from_index(2),
            token_out: AssetId::from_index(3),
            amount_in: Amount::new(100),
            amount_out: Amount::new(90),
            fee_amount: Amount::new(1),
        };
        let Ok(value) = serde_json::to_value(&ev) else {
            panic!("serialize failed");
        };
        assert_eq!(value["event"], "Swapped");
        assert_eq!(value["amountIn"], 100);
        assert_eq!(value["amountOut"], 90);
        assert_eq!(value["feeAmount"], 1);
        assert!(value.get("tokenIn").is_some());
        assert_eq!(ev.name(), "Swapped");
    }

    #[test]
    fn joined_field_names() {
        let ev = PoolEvent::Joined {
            owner: AccountId::from_index(4),
            shares_minted: Shares::new(1_000),
            amounts_in: vec![Amount::new(1_000), Amount::new(1_000)],
            refunds: vec![Amount::ZERO, Amount::ZERO],
        };
        let Ok(json) = serde_json::to_string(&ev) else {
            panic!("serialize failed");
        };
        assert!(json.starts_with("{\"event\":\"Joined\""));
        assert!(json.contains("\"sharesMinted\":1000"));
        assert!(json.contains("\"amountsIn\":[1000,1000]"));
    }
}
