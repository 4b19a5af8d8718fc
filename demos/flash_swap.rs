//! Two-phase (flash) swap example.
//!
//! A searcher takes the output of a swap first, settles elsewhere, and
//! repays the input.  A short repayment rolls the pool back.  Pools are
//! shared across threads through the registry.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=info cargo run --example flash_swap
//! ```

use std::thread;

use tracing_subscriber::EnvFilter;
use weighted_amm_core::config::{AmmConfig, WeightedConfig};
use weighted_amm_core::domain::{
    AccountId, Amount, AssetId, FeeRate, JoinRequest, SwapRequest, Timestamp, TxContext,
};
use weighted_amm_core::error::AmmError;
use weighted_amm_core::service::PoolRegistry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (usdc, weth) = (AssetId::from_index(1), AssetId::from_index(2));
    let registry = PoolRegistry::new();
    let pool = registry.create(&AmmConfig::Weighted(WeightedConfig::equal_weights(
        vec![usdc, weth],
        FeeRate::new(30)?,
        AccountId::from_index(100),
    )?))?;
    let lp = TxContext::new(AccountId::from_index(1), Timestamp::new(0));
    pool.join(&lp, &JoinRequest::new(vec![Amount::new(10_000_000), Amount::new(10_000_000)]))?;

    // ── 1. Settled flash swap ───────────────────────────────────────────
    let searcher = TxContext::new(AccountId::from_index(7), Timestamp::new(1));
    let loan = pool.begin_swap(&searcher, &SwapRequest::exact_out(usdc, weth, Amount::new(50_000)))?;
    println!(
        "Ticket {}: received {} WETH, owe {} USDC",
        loan.ticket, loan.quote.amount_out, loan.amount_owed()
    );
    let settled = pool.settle_swap(&searcher, loan.ticket, loan.amount_owed())?;
    println!("Settled, fee {}", settled.fee);

    // ── 2. Short repayment ──────────────────────────────────────────────
    let before = pool.snapshot();
    let loan = pool.begin_swap(&searcher, &SwapRequest::exact_in(usdc, weth, Amount::new(40_000)))?;
    let short = Amount::new(loan.amount_owed().get() - 1);
    match pool.settle_swap(&searcher, loan.ticket, short) {
        Err(AmmError::RepaymentShortfall) => println!("Short repayment rolled back"),
        other => println!("Unexpected: {other:?}"),
    }
    assert_eq!(pool.snapshot(), before);

    // ── 3. Concurrent traders ───────────────────────────────────────────
    let workers: Vec<_> = (0..4u8)
        .map(|t| {
            let Some(shared) = registry.get(pool.id()) else {
                return thread::spawn(|| 0usize);
            };
            thread::spawn(move || {
                let ctx = TxContext::new(AccountId::from_index(20 + t), Timestamp::new(2));
                (0..25)
                    .filter(|k| {
                        let (i, o) = if (k + usize::from(t)) % 2 == 0 { (usdc, weth) } else { (weth, usdc) };
                        shared.swap(&ctx, &SwapRequest::exact_in(i, o, Amount::new(5_000))).is_ok()
                    })
                    .count()
            })
        })
        .collect();
    let mut done = 0;
    for w in workers {
        done += w.join().map_err(|_| "worker panicked")?;
    }
    println!("{done} concurrent swaps executed");

    pool.reconcile()?;
    println!("Reserves: {:?}", pool.snapshot().reserves);
    println!("Fee ledger: {:?}", pool.with_read(|p| p.fee_ledger().accrued().to_vec()));
    Ok(())
}
