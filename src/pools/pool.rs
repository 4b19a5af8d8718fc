//! The pool state machine.
//!
//! A [`Pool`] composes one [`PoolKind`] evaluator, the liquidity
//! accountant and a [`FeeLedger`] around its mutable state: reserves,
//! share supply, per-owner positions, lifetime flow totals and the event
//! journal.
//!
//! Every mutating operation is a transaction.  It checks the deadline
//! first, then computes the complete next state into locals and only
//! assigns it once nothing can fail; an error leaves the pool exactly as
//! it was.
//!
//! ```
//! use weighted_amm_core::config::WeightedConfig;
//! use weighted_amm_core::domain::{
//!     AccountId, Amount, AssetId, FeeRate, JoinRequest, SwapRequest, Timestamp, TxContext,
//! };
//! use weighted_amm_core::pools::Pool;
//! use weighted_amm_core::traits::FromConfig;
//!
//! let (a, b) = (AssetId::from_index(1), AssetId::from_index(2));
//! let admin = AccountId::from_index(9);
//! let Ok(fee) = FeeRate::new(30) else { panic!() };
//! let Ok(cfg) = WeightedConfig::equal_weights(vec![a, b], fee, admin) else { panic!() };
//! let Ok(mut pool) = Pool::from_config(&cfg) else { panic!() };
//!
//! let ctx = TxContext::new(AccountId::from_index(1), Timestamp::new(0));
//! let Ok(_) = pool.join(&ctx, &JoinRequest::new(vec![Amount::new(1_000), Amount::new(1_000)])) else { panic!() };
//! let Ok(q) = pool.swap(&ctx, &SwapRequest::exact_in(a, b, Amount::new(100))) else { panic!() };
//! assert_eq!(q.amount_out, Amount::new(90));
//! assert!(pool.reconcile().is_ok());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::accountant::{compute_amounts_for_exit, compute_shares_for_join};
use super::fee_ledger::FeeLedger;
use super::flash::PendingSwap;
use super::pool_kind::PoolKind;
use crate::config::{AmmConfig, MAX_ASSETS, MIN_ASSETS};
use crate::domain::{
    AccountId, Amount, AssetId, ExitQuote, ExitRequest, FeeRate, JoinQuote, JoinRequest,
    LiquidityPosition, PoolEvent, PoolId, Price, Shares, SwapKind, SwapQuote, SwapRequest,
    TxContext,
};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::{FromConfig, InvariantEvaluator};

/// Lifetime per-asset flows in and out of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTotals {
    /// Everything custody handed to the pool, fees included.
    pub deposited: Vec<Amount>,
    /// Everything the pool paid out through exits and swaps.
    pub withdrawn: Vec<Amount>,
}

impl FlowTotals {
    fn new(n: usize) -> Self {
        Self {
            deposited: vec![Amount::ZERO; n],
            withdrawn: vec![Amount::ZERO; n],
        }
    }

    fn deposit(&mut self, idx: usize, amount: Amount) -> Result<()> {
        add_at(&mut self.deposited, idx, amount)
    }

    fn withdraw(&mut self, idx: usize, amount: Amount) -> Result<()> {
        add_at(&mut self.withdrawn, idx, amount)
    }
}

/// Read-only copy of a pool's public state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    /// Pool identifier.
    pub id: PoolId,
    /// Assets in reserve order.
    pub assets: Vec<AssetId>,
    /// Tradable reserves.
    pub reserves: Vec<Amount>,
    /// Outstanding shares.
    pub total_shares: Shares,
    /// Swap fee.
    pub fee: FeeRate,
    /// Fees accrued and not yet collected.
    pub accrued_fees: Vec<Amount>,
    /// Whether a two-phase swap holds the pool.
    pub locked: bool,
}

/// Next state of a swap, computed before anything is committed.
pub(super) struct StagedSwap {
    pub(super) reserves: Vec<Amount>,
    pub(super) ledger: FeeLedger,
    pub(super) flows: FlowTotals,
}

/// A liquidity pool of one invariant kind.
#[derive(Debug, Clone)]
pub struct Pool {
    pub(super) id: PoolId,
    pub(super) assets: Vec<AssetId>,
    pub(super) kind: PoolKind,
    pub(super) fee: FeeRate,
    pub(super) reserves: Vec<Amount>,
    pub(super) total_shares: Shares,
    pub(super) positions: BTreeMap<AccountId, Shares>,
    pub(super) ledger: FeeLedger,
    pub(super) flows: FlowTotals,
    pub(super) pending: Option<PendingSwap>,
    pub(super) next_ticket: u64,
    pub(super) events: Vec<PoolEvent>,
}

impl Pool {
    /// Creates an empty, uninitialized pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for an asset count outside
    ///   `2..=8` or duplicate assets.
    /// - [`AmmError::LengthMismatch`] if the evaluator prices a different
    ///   number of assets.
    pub fn new(
        id: PoolId,
        kind: PoolKind,
        assets: Vec<AssetId>,
        fee: FeeRate,
        fee_authority: AccountId,
    ) -> Result<Self> {
        if assets.len() < MIN_ASSETS || assets.len() > MAX_ASSETS {
            return Err(AmmError::InvalidConfiguration("a pool holds between 2 and 8 assets"));
        }
        if assets.len() != kind.asset_count() {
            return Err(AmmError::LengthMismatch("assets do not match the invariant"));
        }
        for (k, a) in assets.iter().enumerate() {
            if assets.iter().skip(k + 1).any(|b| b == a) {
                return Err(AmmError::InvalidConfiguration("duplicate asset"));
            }
        }
        let n = assets.len();
        Ok(Self {
            id,
            assets,
            kind,
            fee,
            reserves: vec![Amount::ZERO; n],
            total_shares: Shares::ZERO,
            positions: BTreeMap::new(),
            ledger: FeeLedger::new(n, fee_authority),
            flows: FlowTotals::new(n),
            pending: None,
            next_ticket: 1,
            events: Vec::new(),
        })
    }

    /// Reassigns the pool id, as done by a registry on insertion.
    #[must_use]
    pub fn with_id(mut self, id: PoolId) -> Self {
        self.id = id;
        self
    }

    // -- accessors ------------------------------------------------------------

    /// Pool identifier.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Assets in reserve order.
    #[must_use]
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// The pricing invariant.
    #[must_use]
    pub const fn kind(&self) -> &PoolKind {
        &self.kind
    }

    /// Swap fee.
    #[must_use]
    pub const fn fee(&self) -> FeeRate {
        self.fee
    }

    /// Tradable reserves; fees are not included.
    #[must_use]
    pub fn reserves(&self) -> &[Amount] {
        &self.reserves
    }

    /// Outstanding shares.
    #[must_use]
    pub const fn total_shares(&self) -> Shares {
        self.total_shares
    }

    /// `true` once the bootstrap join has happened and shares exist.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        !self.total_shares.is_zero()
    }

    /// `true` while a two-phase swap awaits settlement.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn shares_of(&self, owner: &AccountId) -> Shares {
        self.positions.get(owner).copied().unwrap_or(Shares::ZERO)
    }

    /// Every non-empty position, ordered by owner.
    #[must_use]
    pub fn positions(&self) -> Vec<LiquidityPosition> {
        self.positions
            .iter()
            .map(|(owner, shares)| LiquidityPosition {
                owner: *owner,
                shares: *shares,
            })
            .collect()
    }

    /// The fee ledger.
    #[must_use]
    pub const fn fee_ledger(&self) -> &FeeLedger {
        &self.ledger
    }

    /// Lifetime flow totals.
    #[must_use]
    pub const fn flows(&self) -> &FlowTotals {
        &self.flows
    }

    /// Reserve index of `asset`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidAsset`] if the pool does not hold it.
    pub fn index_of(&self, asset: &AssetId) -> Result<usize> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .ok_or(AmmError::InvalidAsset("asset not in pool"))
    }

    /// Marginal price of `base` in units of `quote`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PoolNotInitialized`], [`AmmError::InvalidAsset`], or
    /// errors from the evaluator.
    pub fn spot_price(&self, base: &AssetId, quote: &AssetId) -> Result<Price> {
        self.ensure_initialized()?;
        self.kind
            .spot_price(&self.reserves, self.index_of(base)?, self.index_of(quote)?)
    }

    /// Copy of the public state.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            id: self.id,
            assets: self.assets.clone(),
            reserves: self.reserves.clone(),
            total_shares: self.total_shares,
            fee: self.fee,
            accrued_fees: self.ledger.accrued().to_vec(),
            locked: self.is_locked(),
        }
    }

    /// Drains the event journal.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    // -- quotes ---------------------------------------------------------------

    /// Prices `request` against the current reserves, slippage bounds
    /// included, without touching state.
    ///
    /// # Errors
    ///
    /// - [`AmmError::SettlementPending`] while a two-phase swap is open.
    /// - [`AmmError::PoolNotInitialized`] before the bootstrap join.
    /// - [`AmmError::InvalidAsset`] for unknown or equal assets.
    /// - [`AmmError::SlippageExceeded`] when a bound is violated.
    /// - Evaluator errors.
    pub fn quote_swap(&self, request: &SwapRequest) -> Result<SwapQuote> {
        self.ensure_unlocked()?;
        self.ensure_initialized()?;
        let i = self.index_of(&request.token_in)?;
        let j = self.index_of(&request.token_out)?;
        let quote = match request.kind {
            SwapKind::ExactIn {
                amount_in,
                min_amount_out,
            } => {
                let q = self
                    .kind
                    .compute_out_given_in(&self.reserves, self.fee, i, j, amount_in)?;
                if q.amount_out < min_amount_out {
                    return Err(AmmError::SlippageExceeded("amount out below minimum"));
                }
                q
            }
            SwapKind::ExactOut {
                amount_out,
                max_amount_in,
            } => {
                let q = self
                    .kind
                    .compute_in_given_out(&self.reserves, self.fee, i, j, amount_out)?;
                if q.amount_in > max_amount_in {
                    return Err(AmmError::SlippageExceeded("amount in above maximum"));
                }
                q
            }
        };
        debug!(
            pool = %self.id,
            kind = %request.kind,
            amount_in = %quote.amount_in,
            amount_out = %quote.amount_out,
            fee = %quote.fee,
            "swap quoted"
        );
        Ok(quote)
    }

    /// Prices a join without touching state.
    ///
    /// # Errors
    ///
    /// [`AmmError::SettlementPending`] while a two-phase swap is open, and
    /// the errors of [`compute_shares_for_join`].
    pub fn quote_join(&self, amounts_in: &[Amount]) -> Result<JoinQuote> {
        let (quote, _) = self.price_join(amounts_in)?;
        debug!(pool = %self.id, shares = %quote.shares, "join quoted");
        Ok(quote)
    }

    /// The join quote, plus the kind to install when the deposit fixes
    /// the pool's weights.
    fn price_join(&self, amounts_in: &[Amount]) -> Result<(JoinQuote, Option<PoolKind>)> {
        self.ensure_unlocked()?;
        let fixed = if self.total_shares.is_zero() && self.kind.awaits_deposit() {
            Some(self.kind.fixed_by_deposit(amounts_in)?)
        } else {
            None
        };
        let quote = compute_shares_for_join(
            fixed.as_ref().unwrap_or(&self.kind),
            self.fee,
            &self.reserves,
            self.total_shares,
            amounts_in,
        )?;
        Ok((quote, fixed))
    }

    /// Prices an exit without touching state.
    ///
    /// # Errors
    ///
    /// [`AmmError::SettlementPending`] while a two-phase swap is open, and
    /// the errors of [`compute_amounts_for_exit`].
    pub fn quote_exit(&self, shares: Shares) -> Result<ExitQuote> {
        self.ensure_unlocked()?;
        let quote = compute_amounts_for_exit(&self.reserves, self.total_shares, shares)?;
        debug!(pool = %self.id, shares = %shares, "exit quoted");
        Ok(quote)
    }

    // -- mutations ------------------------------------------------------------

    /// Deposits liquidity and mints shares to the caller.
    ///
    /// The first join bootstraps the pool; a weighted pool created without
    /// weights takes them from the ratio of this deposit.  Unused deposit
    /// comes back in [`JoinQuote::refunds`]; custody returns it to the
    /// caller.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DeadlineExpired`], checked before anything else.
    /// - [`AmmError::SettlementPending`] while a two-phase swap is open.
    /// - [`AmmError::SlippageExceeded`] if fewer than `min_shares_out`
    ///   shares would be minted.
    /// - [`AmmError::InvalidWeight`] if a bootstrap deposit that fixes the
    ///   weights gives some asset less than 1 %.
    /// - The errors of [`compute_shares_for_join`].
    pub fn join(&mut self, ctx: &TxContext, request: &JoinRequest) -> Result<JoinQuote> {
        ctx.check_deadline(request.deadline)?;
        let (quote, fixed) = self.price_join(&request.amounts_in)?;
        if quote.shares < request.min_shares_out {
            return Err(AmmError::SlippageExceeded("shares minted below minimum"));
        }

        let mut reserves = self.reserves.clone();
        let mut flows = self.flows.clone();
        let mut ledger = self.ledger.clone();
        for (idx, (used, fee)) in quote.amounts_used.iter().zip(&quote.fees).enumerate() {
            add_at(&mut reserves, idx, used.safe_sub(fee)?)?;
            flows.deposit(idx, *used)?;
        }
        ledger.record_fees(&quote.fees)?;
        let total_shares = self.total_shares.safe_add(&quote.shares)?;
        let owner_shares = self.shares_of(&ctx.caller).safe_add(&quote.shares)?;

        let bootstrap = !self.is_initialized();
        if let Some(kind) = fixed {
            if let Some(weights) = kind.weights() {
                let bps: Vec<u32> = weights.iter().map(|w| w.bps()).collect();
                info!(pool = %self.id, weights = ?bps, "weights fixed from bootstrap deposit");
            }
            self.kind = kind;
        }
        self.reserves = reserves;
        self.flows = flows;
        self.ledger = ledger;
        self.total_shares = total_shares;
        self.positions.insert(ctx.caller, owner_shares);
        self.events.push(PoolEvent::Joined {
            owner: ctx.caller,
            shares_minted: quote.shares,
            amounts_in: quote.amounts_used.clone(),
            refunds: quote.refunds.clone(),
        });
        info!(
            pool = %self.id,
            owner = %ctx.caller,
            shares = %quote.shares,
            total_shares = %self.total_shares,
            bootstrap,
            "liquidity joined"
        );
        Ok(quote)
    }

    /// Burns the caller's shares for a proportional slice of every
    /// reserve.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DeadlineExpired`], checked before anything else.
    /// - [`AmmError::SettlementPending`] while a two-phase swap is open.
    /// - [`AmmError::EmptyPool`] with no shares outstanding.
    /// - [`AmmError::InsufficientShares`] beyond the caller's balance.
    /// - [`AmmError::LengthMismatch`] / [`AmmError::SlippageExceeded`] for
    ///   bad or violated `min_amounts_out`.
    pub fn exit(&mut self, ctx: &TxContext, request: &ExitRequest) -> Result<ExitQuote> {
        ctx.check_deadline(request.deadline)?;
        self.ensure_unlocked()?;
        if self.total_shares.is_zero() {
            return Err(AmmError::EmptyPool);
        }
        let held = self.shares_of(&ctx.caller);
        if request.shares > held {
            return Err(AmmError::InsufficientShares);
        }
        let quote = self.quote_exit(request.shares)?;
        if !request.min_amounts_out.is_empty() {
            if request.min_amounts_out.len() != self.assets.len() {
                return Err(AmmError::LengthMismatch("minimum amounts do not match the pool's assets"));
            }
            if quote
                .amounts_out
                .iter()
                .zip(&request.min_amounts_out)
                .any(|(out, min)| out < min)
            {
                return Err(AmmError::SlippageExceeded("amount out below minimum"));
            }
        }

        let mut reserves = self.reserves.clone();
        let mut flows = self.flows.clone();
        for (idx, out) in quote.amounts_out.iter().enumerate() {
            sub_at(&mut reserves, idx, *out)?;
            flows.withdraw(idx, *out)?;
        }
        let total_shares = self.total_shares.safe_sub(&quote.shares)?;
        let remaining = held.safe_sub(&quote.shares)?;

        self.reserves = reserves;
        self.flows = flows;
        self.total_shares = total_shares;
        if remaining.is_zero() {
            self.positions.remove(&ctx.caller);
        } else {
            self.positions.insert(ctx.caller, remaining);
        }
        self.events.push(PoolEvent::Exited {
            owner: ctx.caller,
            shares_burned: quote.shares,
            amounts_out: quote.amounts_out.clone(),
        });
        info!(
            pool = %self.id,
            owner = %ctx.caller,
            shares = %quote.shares,
            total_shares = %self.total_shares,
            "liquidity exited"
        );
        Ok(quote)
    }

    /// Executes a swap.  The output goes to the request's recipient, or to
    /// the caller when none is set.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DeadlineExpired`], checked before anything else.
    /// - Everything [`quote_swap`](Self::quote_swap) returns.
    /// - [`AmmError::InvariantViolation`] if the new reserves would shrink
    ///   the invariant.
    pub fn swap(&mut self, ctx: &TxContext, request: &SwapRequest) -> Result<SwapQuote> {
        ctx.check_deadline(request.deadline)?;
        let quote = self.quote_swap(request)?;
        let staged = self.stage_swap(&self.reserves, &quote)?;
        self.commit_swap(staged);

        let recipient = request.recipient.unwrap_or(ctx.caller);
        self.events.push(PoolEvent::Swapped {
            sender: ctx.caller,
            recipient,
            token_in: request.token_in,
            token_out: request.token_out,
            amount_in: quote.amount_in,
            amount_out: quote.amount_out,
            fee_amount: quote.fee,
        });
        info!(
            pool = %self.id,
            sender = %ctx.caller,
            amount_in = %quote.amount_in,
            amount_out = %quote.amount_out,
            fee = %quote.fee,
            "swap executed"
        );
        Ok(quote)
    }

    /// Hands every accrued fee to `recipient`.  Only the fee authority may
    /// call it.
    ///
    /// # Errors
    ///
    /// [`AmmError::SettlementPending`], [`AmmError::Unauthorized`].
    pub fn collect_fees(&mut self, ctx: &TxContext, recipient: AccountId) -> Result<Vec<Amount>> {
        self.ensure_unlocked()?;
        let mut ledger = self.ledger.clone();
        let amounts = ledger.collect(ctx.caller)?;
        self.ledger = ledger;
        self.events.push(PoolEvent::FeesCollected {
            recipient,
            amounts: amounts.clone(),
        });
        info!(pool = %self.id, recipient = %recipient, "fees collected");
        Ok(amounts)
    }

    /// Passes the fee authority role to `next`.
    ///
    /// # Errors
    ///
    /// [`AmmError::SettlementPending`], [`AmmError::Unauthorized`].
    pub fn set_fee_authority(&mut self, ctx: &TxContext, next: AccountId) -> Result<()> {
        self.ensure_unlocked()?;
        let previous = self.ledger.set_authority(ctx.caller, next)?;
        self.events.push(PoolEvent::FeeAuthorityChanged {
            previous,
            current: next,
        });
        info!(pool = %self.id, previous = %previous, current = %next, "fee authority changed");
        Ok(())
    }

    /// Moves `shares` from the caller to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::SettlementPending`] while a two-phase swap is open.
    /// - [`AmmError::InvalidQuantity`] for zero shares.
    /// - [`AmmError::InsufficientShares`] beyond the caller's balance.
    pub fn transfer_shares(&mut self, ctx: &TxContext, to: AccountId, shares: Shares) -> Result<()> {
        self.ensure_unlocked()?;
        if shares.is_zero() {
            return Err(AmmError::InvalidQuantity("transfer must move shares"));
        }
        let held = self.shares_of(&ctx.caller);
        if shares > held {
            return Err(AmmError::InsufficientShares);
        }
        if to != ctx.caller {
            let remaining = held.safe_sub(&shares)?;
            let received = self.shares_of(&to).safe_add(&shares)?;
            if remaining.is_zero() {
                self.positions.remove(&ctx.caller);
            } else {
                self.positions.insert(ctx.caller, remaining);
            }
            self.positions.insert(to, received);
        }
        self.events.push(PoolEvent::SharesTransferred {
            from: ctx.caller,
            to,
            shares,
        });
        info!(pool = %self.id, from = %ctx.caller, to = %to, shares = %shares, "shares transferred");
        Ok(())
    }

    /// Checks the books: for every asset the lifetime deposits equal
    /// reserves plus withdrawals plus accrued and collected fees, and the
    /// positions add up to the share supply.
    ///
    /// # Errors
    ///
    /// [`AmmError::SettlementPending`] while a two-phase swap is open,
    /// [`AmmError::InvariantViolation`] if either check fails.
    pub fn reconcile(&self) -> Result<()> {
        self.ensure_unlocked()?;
        let per_asset = self
            .flows
            .deposited
            .iter()
            .zip(&self.flows.withdrawn)
            .zip(&self.reserves)
            .zip(self.ledger.accrued().iter().zip(self.ledger.collected()));
        for (idx, (((deposited, withdrawn), reserve), (accrued, collected))) in per_asset.enumerate() {
            let accounted = reserve
                .safe_add(withdrawn)?
                .safe_add(accrued)?
                .safe_add(collected)?;
            if accounted != *deposited {
                warn!(
                    pool = %self.id,
                    asset = idx,
                    deposited = %deposited,
                    accounted = %accounted,
                    "fee ledger does not reconcile"
                );
                return Err(AmmError::InvariantViolation("fee ledger does not reconcile"));
            }
        }
        let mut held = Shares::ZERO;
        for shares in self.positions.values() {
            held = held.safe_add(shares)?;
        }
        if held != self.total_shares {
            warn!(pool = %self.id, held = %held, total = %self.total_shares, "positions do not add up");
            return Err(AmmError::InvariantViolation("positions do not sum to total shares"));
        }
        Ok(())
    }

    // -- internals ------------------------------------------------------------

    pub(super) const fn ensure_unlocked(&self) -> Result<()> {
        if self.pending.is_some() {
            return Err(AmmError::SettlementPending);
        }
        Ok(())
    }

    const fn ensure_initialized(&self) -> Result<()> {
        if self.total_shares.is_zero() {
            return Err(AmmError::PoolNotInitialized);
        }
        Ok(())
    }

    /// Applies `quote` to `reserves` and checks the invariant.
    pub(super) fn stage_swap(&self, reserves: &[Amount], quote: &SwapQuote) -> Result<StagedSwap> {
        let (i, j) = (quote.index_in, quote.index_out);
        let mut after = reserves.to_vec();
        add_at(&mut after, i, quote.net_in())?;
        sub_at(&mut after, j, quote.amount_out)?;
        if let Err(err) = self.kind.verify_swap(reserves, &after) {
            warn!(pool = %self.id, error = %err, "swap rejected by invariant check");
            return Err(err);
        }
        let mut ledger = self.ledger.clone();
        ledger.record_fee(i, quote.fee)?;
        let mut flows = self.flows.clone();
        flows.deposit(i, quote.amount_in)?;
        flows.withdraw(j, quote.amount_out)?;
        Ok(StagedSwap {
            reserves: after,
            ledger,
            flows,
        })
    }

    pub(super) fn commit_swap(&mut self, staged: StagedSwap) {
        self.reserves = staged.reserves;
        self.ledger = staged.ledger;
        self.flows = staged.flows;
    }
}

impl FromConfig<AmmConfig> for Pool {
    fn from_config(config: &AmmConfig) -> Result<Self> {
        config.validate()?;
        let kind = match config {
            #[cfg(feature = "weighted")]
            AmmConfig::Weighted(cfg) => PoolKind::Weighted(super::WeightedInvariant::from_config(cfg)?),
            #[cfg(feature = "stable-swap")]
            AmmConfig::StableSwap(cfg) => PoolKind::StableSwap(super::StableSwapInvariant::from_config(cfg)?),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(AmmError::InvalidConfiguration(
                    "requested pool kind is not enabled (missing feature flag)",
                ));
            }
        };
        Self::new(
            PoolId::default(),
            kind,
            config.assets().to_vec(),
            config.fee(),
            config.fee_authority(),
        )
    }
}

#[cfg(feature = "weighted")]
impl FromConfig<crate::config::WeightedConfig> for Pool {
    fn from_config(config: &crate::config::WeightedConfig) -> Result<Self> {
        Self::from_config(&AmmConfig::Weighted(config.clone()))
    }
}

#[cfg(feature = "stable-swap")]
impl FromConfig<crate::config::StableSwapConfig> for Pool {
    fn from_config(config: &crate::config::StableSwapConfig) -> Result<Self> {
        Self::from_config(&AmmConfig::StableSwap(config.clone()))
    }
}

fn add_at(values: &mut [Amount], idx: usize, amount: Amount) -> Result<()> {
    let slot = values
        .get_mut(idx)
        .ok_or(AmmError::InvalidAsset("asset index out of range"))?;
    *slot = slot.safe_add(&amount)?;
    Ok(())
}

fn sub_at(values: &mut [Amount], idx: usize, amount: Amount) -> Result<()> {
    let slot = values
        .get_mut(idx)
        .ok_or(AmmError::InvalidAsset("asset index out of range"))?;
    *slot = slot.safe_sub(&amount)?;
    Ok(())
}
