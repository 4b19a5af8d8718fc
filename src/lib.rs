//! # Weighted AMM Core
//!
//! Deterministic pricing, liquidity-share accounting and fee bookkeeping
//! for multi-asset AMM pools, in integer fixed-point arithmetic.
//!
//! Two invariant families are supported:
//!
//! - **Weighted** (Balancer style, `Π Bᵢ^wᵢ`), `weighted` feature
//! - **StableSwap** (Curve style, amplified sum/product), `stable-swap` feature
//!
//! A pool never moves tokens.  Custody transfers funds, then calls the
//! pool, which returns the deltas (amounts used, refunds, amounts out) and
//! appends a [`PoolEvent`](domain::PoolEvent) to its journal.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `weighted` | yes | Weighted-product pools |
//! | `stable-swap` | yes | StableSwap pools |
//! | `all-pools` | yes | Both pool kinds |
//!
//! # Quick Start
//!
//! ```toml
//! [dependencies]
//! weighted-amm-core = "0.1"
//! ```
//!
//! ## Create a pool, bootstrap it and swap
//!
//! ```rust
//! use weighted_amm_core::config::{AmmConfig, WeightedConfig};
//! use weighted_amm_core::domain::{
//!     AccountId, Amount, AssetId, FeeRate, JoinRequest, SwapRequest, Timestamp, TxContext,
//! };
//! use weighted_amm_core::factory::DefaultPoolFactory;
//!
//! let usdc = AssetId::from_index(1);
//! let weth = AssetId::from_index(2);
//! let treasury = AccountId::from_index(9);
//!
//! // 1. A 50/50 pool with a 0.30% fee
//! let fee = FeeRate::new(30).expect("valid fee");
//! let config = AmmConfig::Weighted(
//!     WeightedConfig::equal_weights(vec![usdc, weth], fee, treasury).expect("valid config"),
//! );
//! let mut pool = DefaultPoolFactory::create(&config).expect("pool created");
//!
//! // 2. Bootstrap join
//! let lp = TxContext::new(AccountId::from_index(1), Timestamp::new(0));
//! let joined = pool
//!     .join(&lp, &JoinRequest::new(vec![Amount::new(1_000), Amount::new(1_000)]))
//!     .expect("bootstrap");
//! assert_eq!(joined.shares.get(), 1_000);
//!
//! // 3. Sell 100 USDC
//! let trader = TxContext::new(AccountId::from_index(2), Timestamp::new(0));
//! let quote = pool
//!     .swap(&trader, &SwapRequest::exact_in(usdc, weth, Amount::new(100)))
//!     .expect("swap succeeded");
//! assert_eq!(quote.amount_out, Amount::new(90));
//! assert_eq!(quote.fee, Amount::new(1));
//! assert!(pool.reconcile().is_ok());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Service    │  SharedPool (RwLock), PoolRegistry (DashMap)
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Pool      │  state machine: join / exit / swap / flash / fees
//! └──────┬───────┘
//!        │ PoolKind (enum dispatch)
//!        ▼
//! ┌──────────────┐
//! │  Invariants  │  WeightedInvariant, StableSwapInvariant
//! └──────┬───────┘
//!        │ InvariantEvaluator
//!        ▼
//! ┌──────────────┐
//! │    Math      │  WAD fixed point, ln/exp, Newton solvers, U256
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`FeeRate`](domain::FeeRate), requests, quotes, events |
//! | [`traits`] | [`InvariantEvaluator`](traits::InvariantEvaluator), [`FromConfig`](traits::FromConfig) |
//! | [`config`] | [`AmmConfig`](config::AmmConfig) and per-kind configs |
//! | [`pools`]  | Invariants, the liquidity accountant, the fee ledger and [`Pool`](pools::Pool) |
//! | [`factory`] | [`DefaultPoolFactory`](factory::DefaultPoolFactory) |
//! | [`service`] | [`SharedPool`](service::SharedPool) and [`PoolRegistry`](service::PoolRegistry) |
//! | [`math`]   | Checked and directed-rounding fixed-point arithmetic |
//! | [`error`]  | [`AmmError`](error::AmmError) and its [`ErrorClass`](error::ErrorClass) |
//! | [`prelude`] | Convenience re-exports |
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (`debug` for quotes, `info` for
//! committed mutations, `warn` for rejected invariant checks and aborted
//! settlements) and never installs a subscriber.

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod service;
pub mod traits;
