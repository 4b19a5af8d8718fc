//! Weighted pool example (Balancer style).
//!
//! Creates an 80/20 pool, bootstraps it, trades in both directions, adds
//! single-sided liquidity and collects the fees.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=debug cargo run --example weighted
//! ```

use tracing_subscriber::EnvFilter;
use weighted_amm_core::config::{AmmConfig, WeightedConfig};
use weighted_amm_core::domain::{
    AccountId, Amount, AssetId, ExitRequest, FeeRate, JoinRequest, SwapRequest, Timestamp,
    TxContext, Weight,
};
use weighted_amm_core::factory::DefaultPoolFactory;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Weighted Pool (80/20) ===\n");

    // ── 1. Configure ────────────────────────────────────────────────────
    let weth = AssetId::from_index(1);
    let dai = AssetId::from_index(2);
    let treasury = AccountId::from_index(100);
    let config = AmmConfig::Weighted(WeightedConfig::new(
        vec![weth, dai],
        vec![Weight::new(8_000)?, Weight::new(2_000)?],
        FeeRate::new(30)?,
        treasury,
    )?);
    println!("Config JSON: {}", config.to_json()?);

    let mut pool = DefaultPoolFactory::create(&config)?;

    // ── 2. Bootstrap ────────────────────────────────────────────────────
    let lp = TxContext::new(AccountId::from_index(1), Timestamp::new(0));
    let joined = pool.join(
        &lp,
        &JoinRequest::new(vec![Amount::new(1_000_000), Amount::new(4_000_000)]),
    )?;
    println!("\nBootstrap minted {} shares", joined.shares);
    println!("Spot price WETH/DAI: {}", pool.spot_price(&weth, &dai)?);

    // ── 3. Trade ────────────────────────────────────────────────────────
    let trader = TxContext::new(AccountId::from_index(2), Timestamp::new(10));
    let sell = pool.swap(&trader, &SwapRequest::exact_in(weth, dai, Amount::new(10_000)))?;
    println!(
        "\nSold {} WETH for {} DAI (fee {})",
        sell.amount_in, sell.amount_out, sell.fee
    );
    let buy = pool.swap(&trader, &SwapRequest::exact_out(dai, weth, Amount::new(5_000)))?;
    println!(
        "Bought {} WETH for {} DAI (fee {})",
        buy.amount_out, buy.amount_in, buy.fee
    );
    println!("Reserves: {:?}", pool.reserves());

    // ── 4. Single-sided join ────────────────────────────────────────────
    let single = pool.join(
        &trader,
        &JoinRequest::new(vec![Amount::ZERO, Amount::new(100_000)]),
    )?;
    println!(
        "\nSingle-sided DAI join minted {} shares, fee {:?}",
        single.shares, single.fees
    );

    // ── 5. Exit and collect ─────────────────────────────────────────────
    let out = pool.exit(&trader, &ExitRequest::new(single.shares))?;
    println!("Exit paid {:?}", out.amounts_out);

    let admin = TxContext::new(treasury, Timestamp::new(20));
    let fees = pool.collect_fees(&admin, treasury)?;
    println!("Collected fees: {fees:?}");

    pool.reconcile()?;
    println!("\nBooks reconcile. Events:");
    for event in pool.take_events() {
        println!("  {}", serde_json::to_string(&event)?);
    }
    Ok(())
}
