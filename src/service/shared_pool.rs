//! Single-writer / many-reader pool handle.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{
    AccountId, Amount, AssetId, ExitQuote, ExitRequest, JoinQuote, JoinRequest, PoolEvent, PoolId,
    Price, Shares, SwapQuote, SwapRequest, TxContext,
};
use crate::error::Result;
use crate::pools::{FlashLoan, Pool, PoolSnapshot};

/// Cloneable handle to a [`Pool`] behind a `parking_lot` read-write lock.
///
/// Quotes and snapshots take the read lock.  Every mutation takes the
/// write lock for its whole transaction, so two writers never interleave
/// and readers never observe a half-applied state.
#[derive(Debug, Clone)]
pub struct SharedPool {
    inner: Arc<RwLock<Pool>>,
}

impl SharedPool {
    /// Wraps `pool`.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool)),
        }
    }

    /// Runs `f` under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&Pool) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock.  Several pool calls made inside one
    /// closure are atomic with respect to every other handle.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Pool) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// `true` if both handles point at the same pool.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -- reads ----------------------------------------------------------------

    /// The wrapped pool's id.
    #[must_use]
    pub fn id(&self) -> PoolId {
        self.inner.read().id()
    }

    /// Copy of the pool's public state, taken under one read lock.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        self.inner.read().snapshot()
    }

    /// Shares held by `owner`; zero for unknown accounts.
    #[must_use]
    pub fn shares_of(&self, owner: &AccountId) -> Shares {
        self.inner.read().shares_of(owner)
    }

    /// # Errors
    ///
    /// As [`Pool::spot_price`].
    pub fn spot_price(&self, base: &AssetId, quote: &AssetId) -> Result<Price> {
        self.inner.read().spot_price(base, quote)
    }

    /// # Errors
    ///
    /// As [`Pool::quote_swap`].
    pub fn quote_swap(&self, request: &SwapRequest) -> Result<SwapQuote> {
        self.inner.read().quote_swap(request)
    }

    /// # Errors
    ///
    /// As [`Pool::quote_join`].
    pub fn quote_join(&self, amounts_in: &[Amount]) -> Result<JoinQuote> {
        self.inner.read().quote_join(amounts_in)
    }

    /// # Errors
    ///
    /// As [`Pool::quote_exit`].
    pub fn quote_exit(&self, shares: Shares) -> Result<ExitQuote> {
        self.inner.read().quote_exit(shares)
    }

    /// # Errors
    ///
    /// As [`Pool::reconcile`].
    pub fn reconcile(&self) -> Result<()> {
        self.inner.read().reconcile()
    }

    // -- writes ---------------------------------------------------------------

    /// # Errors
    ///
    /// As [`Pool::join`].
    pub fn join(&self, ctx: &TxContext, request: &JoinRequest) -> Result<JoinQuote> {
        self.inner.write().join(ctx, request)
    }

    /// # Errors
    ///
    /// As [`Pool::exit`].
    pub fn exit(&self, ctx: &TxContext, request: &ExitRequest) -> Result<ExitQuote> {
        self.inner.write().exit(ctx, request)
    }

    /// # Errors
    ///
    /// As [`Pool::swap`].
    pub fn swap(&self, ctx: &TxContext, request: &SwapRequest) -> Result<SwapQuote> {
        self.inner.write().swap(ctx, request)
    }

    /// # Errors
    ///
    /// As [`Pool::collect_fees`].
    pub fn collect_fees(&self, ctx: &TxContext, recipient: AccountId) -> Result<Vec<Amount>> {
        self.inner.write().collect_fees(ctx, recipient)
    }

    /// # Errors
    ///
    /// As [`Pool::set_fee_authority`].
    pub fn set_fee_authority(&self, ctx: &TxContext, next: AccountId) -> Result<()> {
        self.inner.write().set_fee_authority(ctx, next)
    }

    /// # Errors
    ///
    /// As [`Pool::transfer_shares`].
    pub fn transfer_shares(&self, ctx: &TxContext, to: AccountId, shares: Shares) -> Result<()> {
        self.inner.write().transfer_shares(ctx, to, shares)
    }

    /// # Errors
    ///
    /// As [`Pool::begin_swap`].
    pub fn begin_swap(&self, ctx: &TxContext, request: &SwapRequest) -> Result<FlashLoan> {
        self.inner.write().begin_swap(ctx, request)
    }

    /// # Errors
    ///
    /// As [`Pool::settle_swap`].
    pub fn settle_swap(&self, ctx: &TxContext, ticket: u64, amount_repaid: Amount) -> Result<SwapQuote> {
        self.inner.write().settle_swap(ctx, ticket, amount_repaid)
    }

    /// # Errors
    ///
    /// As [`Pool::abort_swap`].
    pub fn abort_swap(&self, ctx: &TxContext, ticket: u64) -> Result<()> {
        self.inner.write().abort_swap(ctx, ticket)
    }

    /// Drains the event journal.
    pub fn take_events(&self) -> Vec<PoolEvent> {
        self.inner.write().take_events()
    }
}

impl From<Pool> for SharedPool {
    fn from(pool: Pool) -> Self {
        Self::new(pool)
    }
}

#[cfg(all(test, feature = "weighted"))]
#[allow(clippy::panic)]
mod tests {
    use std::thread;

    use super::*;
    use crate::config::WeightedConfig;
    use crate::domain::{FeeRate, Timestamp};
    use crate::error::AmmError;
    use crate::traits::FromConfig;

    const A: AssetId = AssetId::from_index(1);
    const B: AssetId = AssetId::from_index(2);
    const ADMIN: AccountId = AccountId::from_index(100);
    const ALICE: AccountId = AccountId::from_index(1);

    fn ctx(who: AccountId) -> TxContext {
        TxContext::new(who, Timestamp::new(0))
    }

    fn seeded(reserve: u128) -> SharedPool {
        let Ok(fee) = FeeRate::new(30) else {
            panic!("fee");
        };
        let Ok(cfg) = WeightedConfig::equal_weights(vec![A, B], fee, ADMIN) else {
            panic!("config");
        };
        let Ok(pool) = Pool::from_config(&cfg) else {
            panic!("pool");
        };
        let shared = SharedPool::new(pool);
        let Ok(_) = shared.join(
            &ctx(ALICE),
            &JoinRequest::new(vec![Amount::new(reserve), Amount::new(reserve)]),
        ) else {
            panic!("bootstrap");
        };
        shared
    }

    #[test]
    fn clones_share_state() {
        let p = seeded(1_000);
        let q = p.clone();
        assert!(p.ptr_eq(&q));
        let Ok(out) = q.swap(&ctx(ALICE), &SwapRequest::exact_in(A, B, Amount::new(100))) else {
            panic!("swap");
        };
        assert_eq!(out.amount_out, Amount::new(90));
        assert_eq!(p.snapshot().reserves, vec![Amount::new(1_099), Amount::new(910)]);
        assert_eq!(p.take_events().len(), 2);
        assert!(q.take_events().is_empty());
    }

    #[test]
    fn with_write_groups_calls() {
        let p = seeded(1_000);
        let total = p.with_write(|pool| {
            let Ok(loan) = pool.begin_swap(&ctx(ALICE), &SwapRequest::exact_in(A, B, Amount::new(100))) else {
                panic!("begin");
            };
            let Ok(_) = pool.settle_swap(&ctx(ALICE), loan.ticket, loan.amount_owed()) else {
                panic!("settle");
            };
            pool.total_shares()
        });
        assert_eq!(total, Shares::new(1_000));
        assert!(p.with_read(|pool| !pool.is_locked()));
        assert!(p.reconcile().is_ok());
    }

    #[test]
    fn pending_swap_blocks_other_handles() {
        let p = seeded(1_000);
        let Ok(loan) = p.begin_swap(&ctx(ALICE), &SwapRequest::exact_in(A, B, Amount::new(10))) else {
            panic!("begin");
        };
        let other = p.clone();
        assert_eq!(
            other.quote_swap(&SwapRequest::exact_in(A, B, Amount::new(1))),
            Err(AmmError::SettlementPending)
        );
        assert!(p.abort_swap(&ctx(ALICE), loan.ticket).is_ok());
        assert!(other.quote_swap(&SwapRequest::exact_in(A, B, Amount::new(1))).is_ok());
    }

    #[test]
    fn concurrent_writers_keep_books_balanced() {
        let p = seeded(10_000_000);
        let handles: Vec<_> = (0..8u8)
            .map(|t| {
                let pool = p.clone();
                thread::spawn(move || {
                    let trader = ctx(AccountId::from_index(10 + t));
                    let mut ok = 0usize;
                    for k in 0..50u128 {
                        let (i, o) = if (k + u128::from(t)) % 2 == 0 { (A, B) } else { (B, A) };
                        let req = SwapRequest::exact_in(i, o, Amount::new(1_000 + k * 37));
                        if pool.swap(&trader, &req).is_ok() {
                            ok += 1;
                        }
                        let _ = pool.quote_swap(&SwapRequest::exact_in(A, B, Amount::new(500)));
                    }
                    ok
                })
            })
            .collect();
        let mut succeeded = 0;
        for h in handles {
            let Ok(n) = h.join() else {
                panic!("worker panicked");
            };
            succeeded += n;
        }
        assert_eq!(succeeded, 400);
        assert!(p.reconcile().is_ok());
        let swaps = p
            .take_events()
            .iter()
            .filter(|e| e.name() == "Swapped")
            .count();
        assert_eq!(swaps, succeeded);
    }
}
