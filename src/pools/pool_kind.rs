//! Enum dispatch over the enabled invariant kinds.
//!
//! A pool's kind is chosen when it is created.  Weighted pools created
//! without weights fix them once, from the bootstrap deposit.  [`PoolKind`] implements
//! [`InvariantEvaluator`] by forwarding every call to the inner evaluator
//! through a `match`, so no trait objects are involved.

#[cfg(not(any(feature = "weighted", feature = "stable-swap")))]
compile_error!("enable at least one pool kind: `weighted` or `stable-swap`");

#[cfg(feature = "stable-swap")]
use super::stable_swap::StableSwapInvariant;
#[cfg(feature = "weighted")]
use super::weighted::WeightedInvariant;

use crate::domain::{Amount, Price, Shares, Weight};
use crate::error::Result;
use crate::traits::InvariantEvaluator;

/// The invariant a pool prices with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolKind {
    /// Weighted geometric mean (Balancer style).
    #[cfg(feature = "weighted")]
    Weighted(WeightedInvariant),

    /// Amplified hybrid of constant sum and constant product (Curve style).
    #[cfg(feature = "stable-swap")]
    StableSwap(StableSwapInvariant),
}

macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            #[cfg(feature = "weighted")]
            PoolKind::Weighted(k) => k.$method($($arg),*),
            #[cfg(feature = "stable-swap")]
            PoolKind::StableSwap(k) => k.$method($($arg),*),
        }
    };
}

impl PoolKind {
    /// Short lowercase name, as used in configuration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "weighted")]
            Self::Weighted(_) => "weighted",
            #[cfg(feature = "stable-swap")]
            Self::StableSwap(_) => "stable_swap",
        }
    }

    /// Per-asset weights; StableSwap pools report none.
    #[must_use]
    pub fn weights(&self) -> Option<&[Weight]> {
        match self {
            #[cfg(feature = "weighted")]
            Self::Weighted(k) => Some(k.weights()),
            #[cfg(feature = "stable-swap")]
            Self::StableSwap(_) => None,
        }
    }

    /// Whether the bootstrap deposit still decides this kind's weights.
    #[must_use]
    pub const fn awaits_deposit(&self) -> bool {
        match self {
            #[cfg(feature = "weighted")]
            Self::Weighted(k) => k.awaits_deposit(),
            #[cfg(feature = "stable-swap")]
            Self::StableSwap(_) => false,
        }
    }

    /// This kind after a bootstrap deposit of `amounts`.
    ///
    /// # Errors
    ///
    /// See [`WeightedInvariant::fix_weights`].
    #[cfg_attr(not(feature = "weighted"), allow(unused_variables))]
    pub fn fixed_by_deposit(&self, amounts: &[Amount]) -> Result<Self> {
        match self {
            #[cfg(feature = "weighted")]
            Self::Weighted(k) => k.fix_weights(amounts).map(Self::Weighted),
            #[cfg(feature = "stable-swap")]
            Self::StableSwap(k) => Ok(Self::StableSwap(k.clone())),
        }
    }
}

impl InvariantEvaluator for PoolKind {
    fn asset_count(&self) -> usize {
        delegate!(self, asset_count())
    }

    fn out_given_in(&self, reserves: &[Amount], i: usize, j: usize, net_in: Amount) -> Result<Amount> {
        delegate!(self, out_given_in(reserves, i, j, net_in))
    }

    fn estimate_in_given_out(
        &self,
        reserves: &[Amount],
        i: usize,
        j: usize,
        amount_out: Amount,
    ) -> Result<Amount> {
        delegate!(self, estimate_in_given_out(reserves, i, j, amount_out))
    }

    fn invariant_ratio(&self, before: &[Amount], after: &[Amount]) -> Result<u128> {
        delegate!(self, invariant_ratio(before, after))
    }

    fn spot_price(&self, reserves: &[Amount], base: usize, quote: usize) -> Result<Price> {
        delegate!(self, spot_price(reserves, base, quote))
    }

    fn bootstrap_shares(&self, amounts: &[Amount]) -> Result<Shares> {
        delegate!(self, bootstrap_shares(amounts))
    }

    fn verify_swap(&self, before: &[Amount], after: &[Amount]) -> Result<()> {
        delegate!(self, verify_swap(before, after))
    }

    fn check_exact_in_limit(&self, reserves: &[Amount], i: usize, j: usize, net_in: Amount) -> Result<()> {
        delegate!(self, check_exact_in_limit(reserves, i, j, net_in))
    }

    fn check_exact_out_limit(
        &self,
        reserves: &[Amount],
        i: usize,
        j: usize,
        amount_out: Amount,
    ) -> Result<()> {
        delegate!(self, check_exact_out_limit(reserves, i, j, amount_out))
    }
}

#[cfg(feature = "weighted")]
impl From<WeightedInvariant> for PoolKind {
    fn from(k: WeightedInvariant) -> Self {
        Self::Weighted(k)
    }
}

#[cfg(feature = "stable-swap")]
impl From<StableSwapInvariant> for PoolKind {
    fn from(k: StableSwapInvariant) -> Self {
        Self::StableSwap(k)
    }
}
