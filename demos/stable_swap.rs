//! StableSwap pool example (Curve style).
//!
//! Compares slippage of a large stablecoin trade across amplification
//! coefficients, then runs a three-coin pool.
//!
//! # Run
//!
//! ```bash
//! cargo run --example stable_swap
//! ```

use tracing_subscriber::EnvFilter;
use weighted_amm_core::config::{AmmConfig, StableSwapConfig};
use weighted_amm_core::domain::{
    AccountId, Amount, AssetId, FeeRate, JoinRequest, SwapRequest, Timestamp, TxContext,
};
use weighted_amm_core::factory::DefaultPoolFactory;
use weighted_amm_core::pools::Pool;

fn stable_pool(assets: Vec<AssetId>, amp: u32, seed: u128) -> Result<Pool, Box<dyn std::error::Error>> {
    let config = AmmConfig::StableSwap(StableSwapConfig::new(
        assets.clone(),
        amp,
        FeeRate::new(4)?,
        AccountId::from_index(100),
    )?);
    let mut pool = DefaultPoolFactory::create(&config)?;
    let lp = TxContext::new(AccountId::from_index(1), Timestamp::new(0));
    pool.join(&lp, &JoinRequest::new(vec![Amount::new(seed); assets.len()]))?;
    Ok(pool)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let usdc = AssetId::from_index(1);
    let usdt = AssetId::from_index(2);
    let dai = AssetId::from_index(3);
    let trader = TxContext::new(AccountId::from_index(2), Timestamp::new(0));

    println!("=== StableSwap: 100k USDC -> USDT on a 1M/1M pool ===\n");
    println!("{:>6} | {:>10} | {:>6}", "A", "out", "fee");
    for amp in [1, 10, 100, 1_000] {
        let pool = stable_pool(vec![usdc, usdt], amp, 1_000_000)?;
        let q = pool.quote_swap(&SwapRequest::exact_in(usdc, usdt, Amount::new(100_000)))?;
        println!("{amp:>6} | {:>10} | {:>6}", q.amount_out, q.fee);
    }

    println!("\n=== Three-coin pool, A = 200 ===\n");
    let mut pool = stable_pool(vec![usdc, usdt, dai], 200, 5_000_000)?;
    println!("Shares after bootstrap: {}", pool.total_shares());
    for (from, to) in [(usdc, usdt), (usdt, dai), (dai, usdc)] {
        let q = pool.swap(&trader, &SwapRequest::exact_in(from, to, Amount::new(250_000)))?;
        println!("{from} -> {to}: in {} out {}", q.amount_in, q.amount_out);
    }
    println!("Spot price USDC/DAI: {}", pool.spot_price(&usdc, &dai)?);
    pool.reconcile()?;
    println!("Snapshot: {}", serde_json::to_string_pretty(&pool.snapshot())?);
    Ok(())
}
