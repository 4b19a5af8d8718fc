//! Two-phase (flash) swaps.
//!
//! [`Pool::begin_swap`] prices a swap, releases the output from the
//! reserves and locks the pool.  The caller then settles externally and
//! calls [`Pool::settle_swap`] with what it repaid, or
//! [`Pool::abort_swap`] to roll back.  While a swap is open every other
//! mutation and quote fails with [`AmmError::SettlementPending`].
//!
//! A short repayment restores the pre-swap reserves before reporting
//! [`AmmError::RepaymentShortfall`], so the pool never ends up holding a
//! half-finished trade.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::pool::Pool;
use crate::domain::{AccountId, Amount, AssetId, PoolEvent, SwapQuote, SwapRequest, TxContext};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;

/// Handle returned by [`Pool::begin_swap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashLoan {
    /// Identifies the open swap in `settle_swap` / `abort_swap`.
    pub ticket: u64,
    /// Priced swap: `amount_out` has been released, `amount_in` is owed.
    pub quote: SwapQuote,
}

impl FlashLoan {
    /// Gross amount the initiator must repay.
    #[must_use]
    pub const fn amount_owed(&self) -> Amount {
        self.quote.amount_in
    }
}

/// State kept while a two-phase swap is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSwap {
    ticket: u64,
    sender: AccountId,
    recipient: AccountId,
    token_in: AssetId,
    token_out: AssetId,
    quote: SwapQuote,
    reserves_before: Vec<Amount>,
}

impl PendingSwap {
    /// Ticket of the open swap.
    #[must_use]
    pub const fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Initiator, the only account allowed to settle or abort.
    #[must_use]
    pub const fn sender(&self) -> AccountId {
        self.sender
    }

    /// The priced swap.
    #[must_use]
    pub const fn quote(&self) -> &SwapQuote {
        &self.quote
    }
}

impl Pool {
    /// The open two-phase swap, if any.
    #[must_use]
    pub const fn pending_swap(&self) -> Option<&PendingSwap> {
        self.pending.as_ref()
    }

    /// Opens a two-phase swap: prices `request`, debits the output from
    /// the reserves and locks the pool until settlement.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DeadlineExpired`], checked before anything else.
    /// - [`AmmError::SettlementPending`] if a swap is already open.
    /// - Everything [`Pool::quote_swap`] returns.
    pub fn begin_swap(&mut self, ctx: &TxContext, request: &SwapRequest) -> Result<FlashLoan> {
        ctx.check_deadline(request.deadline)?;
        let quote = self.quote_swap(request)?;
        let mut tentative = self.reserves.clone();
        let slot = tentative
            .get_mut(quote.index_out)
            .ok_or(AmmError::InvalidAsset("asset index out of range"))?;
        *slot = slot.safe_sub(&quote.amount_out)?;
        let ticket = self.next_ticket;
        let next_ticket = ticket
            .checked_add(1)
            .ok_or(AmmError::Overflow("flash ticket overflow"))?;

        let pending = PendingSwap {
            ticket,
            sender: ctx.caller,
            recipient: request.recipient.unwrap_or(ctx.caller),
            token_in: request.token_in,
            token_out: request.token_out,
            quote,
            reserves_before: std::mem::replace(&mut self.reserves, tentative),
        };
        self.pending = Some(pending);
        self.next_ticket = next_ticket;
        self.events.push(PoolEvent::FlashSwapOpened {
            ticket,
            sender: ctx.caller,
            token_in: request.token_in,
            token_out: request.token_out,
            amount_owed: quote.amount_in,
            amount_out: quote.amount_out,
        });
        info!(pool = %self.id, ticket, owed = %quote.amount_in, out = %quote.amount_out, "flash swap opened");
        Ok(FlashLoan { ticket, quote })
    }

    /// Finalizes the open swap once `amount_repaid` of the input asset
    /// has arrived.  The pool keeps exactly the quoted input; any surplus
    /// is for custody to hand back.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoPendingSwap`] if nothing is open under `ticket`.
    /// - [`AmmError::Unauthorized`] unless the caller opened the swap.
    /// - [`AmmError::RepaymentShortfall`] after rolling the swap back, when
    ///   `amount_repaid` is below the quoted input.
    /// - [`AmmError::InvariantViolation`] after rolling back, if the final
    ///   reserves fail the invariant check.
    pub fn settle_swap(&mut self, ctx: &TxContext, ticket: u64, amount_repaid: Amount) -> Result<SwapQuote> {
        let pending = self.open_pending(ctx, ticket)?;
        let quote = pending.quote;
        if amount_repaid < quote.amount_in {
            warn!(
                pool = %self.id,
                ticket,
                owed = %quote.amount_in,
                repaid = %amount_repaid,
                "flash swap repayment short; rolling back"
            );
            self.roll_back();
            return Err(AmmError::RepaymentShortfall);
        }
        let staged = match self.stage_swap(&pending.reserves_before, &quote) {
            Ok(staged) => staged,
            Err(err) => {
                self.roll_back();
                return Err(err);
            }
        };

        let (sender, recipient) = (pending.sender, pending.recipient);
        let (token_in, token_out) = (pending.token_in, pending.token_out);
        self.commit_swap(staged);
        self.pending = None;
        self.events.push(PoolEvent::FlashSwapSettled {
            ticket,
            amount_repaid,
            fee_amount: quote.fee,
        });
        self.events.push(PoolEvent::Swapped {
            sender,
            recipient,
            token_in,
            token_out,
            amount_in: quote.amount_in,
            amount_out: quote.amount_out,
            fee_amount: quote.fee,
        });
        info!(pool = %self.id, ticket, repaid = %amount_repaid, "flash swap settled");
        Ok(quote)
    }

    /// Rolls the open swap back; custody must reclaim the released output.
    ///
    /// # Errors
    ///
    /// [`AmmError::NoPendingSwap`], [`AmmError::Unauthorized`].
    pub fn abort_swap(&mut self, ctx: &TxContext, ticket: u64) -> Result<()> {
        self.open_pending(ctx, ticket)?;
        self.roll_back();
        warn!(pool = %self.id, ticket, "flash swap aborted");
        Ok(())
    }

    fn open_pending(&self, ctx: &TxContext, ticket: u64) -> Result<PendingSwap> {
        let pending = self
            .pending
            .as_ref()
            .filter(|p| p.ticket == ticket)
            .ok_or(AmmError::NoPendingSwap)?;
        if pending.sender != ctx.caller {
            return Err(AmmError::Unauthorized("only the initiator may settle a flash swap"));
        }
        Ok(pending.clone())
    }

    fn roll_back(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.reserves = pending.reserves_before;
            self.events.push(PoolEvent::FlashSwapAborted {
                ticket: pending.ticket,
            });
        }
    }
}

#[cfg(all(test, feature = "weighted"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::WeightedConfig;
    use crate::domain::{FeeRate, JoinRequest, Shares, Timestamp};
    use crate::traits::FromConfig;

    const A: AssetId = AssetId::from_index(1);
    const B: AssetId = AssetId::from_index(2);
    const ADMIN: AccountId = AccountId::from_index(100);
    const ALICE: AccountId = AccountId::from_index(1);
    const BOB: AccountId = AccountId::from_index(2);

    fn ctx(who: AccountId) -> TxContext {
        TxContext::new(who, Timestamp::new(0))
    }

    fn seeded() -> Pool {
        let Ok(fee) = FeeRate::new(30) else {
            panic!("fee");
        };
        let Ok(cfg) = WeightedConfig::equal_weights(vec![A, B], fee, ADMIN) else {
            panic!("config");
        };
        let Ok(mut p) = Pool::from_config(&cfg) else {
            panic!("pool");
        };
        let Ok(_) = p.join(&ctx(ALICE), &JoinRequest::new(vec![Amount::new(1_000), Amount::new(1_000)])) else {
            panic!("bootstrap");
        };
        p
    }

    #[test]
    fn settle_finalizes_like_a_swap() {
        let mut p = seeded();
        let Ok(loan) = p.begin_swap(&ctx(BOB), &SwapRequest::exact_in(A, B, Amount::new(100))) else {
            panic!("begin");
        };
        assert_eq!(loan.amount_owed(), Amount::new(100));
        assert_eq!(p.reserves(), &[Amount::new(1_000), Amount::new(910)]);
        assert!(p.is_locked());
        assert_eq!(
            p.swap(&ctx(ALICE), &SwapRequest::exact_in(A, B, Amount::new(1))),
            Err(AmmError::SettlementPending)
        );
        assert_eq!(
            p.join(&ctx(ALICE), &JoinRequest::new(vec![Amount::new(1), Amount::new(1)])),
            Err(AmmError::SettlementPending)
        );
        assert_eq!(p.reconcile(), Err(AmmError::SettlementPending));

        let Ok(q) = p.settle_swap(&ctx(BOB), loan.ticket, Amount::new(120)) else {
            panic!("settle");
        };
        assert_eq!(q.amount_out, Amount::new(90));
        assert_eq!(p.reserves(), &[Amount::new(1_099), Amount::new(910)]);
        assert!(!p.is_locked());
        assert!(p.reconcile().is_ok());
    }

    #[test]
    fn shortfall_restores_state() {
        let mut p = seeded();
        let before = p.snapshot();
        let Ok(loan) = p.begin_swap(&ctx(BOB), &SwapRequest::exact_out(A, B, Amount::new(90))) else {
            panic!("begin");
        };
        assert_eq!(loan.amount_owed(), Amount::new(100));
        assert_eq!(
            p.settle_swap(&ctx(BOB), loan.ticket, Amount::new(99)),
            Err(AmmError::RepaymentShortfall)
        );
        assert_eq!(p.snapshot(), before);
        assert!(p.reconcile().is_ok());
        let names: Vec<_> = p.take_events().iter().map(PoolEvent::name).collect();
        assert_eq!(names, ["Joined", "FlashSwapOpened", "FlashSwapAborted"]);
    }

    #[test]
    fn only_initiator_may_settle() {
        let mut p = seeded();
        let Ok(loan) = p.begin_swap(&ctx(BOB), &SwapRequest::exact_in(A, B, Amount::new(100))) else {
            panic!("begin");
        };
        assert!(matches!(
            p.settle_swap(&ctx(ALICE), loan.ticket, Amount::new(100)),
            Err(AmmError::Unauthorized(_))
        ));
        assert_eq!(
            p.settle_swap(&ctx(BOB), loan.ticket + 1, Amount::new(100)),
            Err(AmmError::NoPendingSwap)
        );
        assert!(p.abort_swap(&ctx(BOB), loan.ticket).is_ok());
        assert_eq!(p.abort_swap(&ctx(BOB), loan.ticket), Err(AmmError::NoPendingSwap));
        assert_eq!(p.shares_of(&ALICE), Shares::new(1_000));
        assert!(p.reconcile().is_ok());
    }

    #[test]
    fn tickets_increase() {
        let mut p = seeded();
        let Ok(first) = p.begin_swap(&ctx(BOB), &SwapRequest::exact_in(A, B, Amount::new(10))) else {
            panic!("begin");
        };
        assert!(p.abort_swap(&ctx(BOB), first.ticket).is_ok());
        let Ok(second) = p.begin_swap(&ctx(BOB), &SwapRequest::exact_in(A, B, Amount::new(10))) else {
            panic!("begin");
        };
        assert!(second.ticket > first.ticket);
    }
}
