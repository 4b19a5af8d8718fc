//! Property-based tests for pool economics.
//!
//! 1. **Invariant monotonicity**: no generated swap trips the invariant
//!    check, and the equal-weight constant product never shrinks.
//! 2. **Share fairness**: balanced joins and exits never lower backing
//!    per share.
//! 3. **Round trip**: `in_given_out(out_given_in(a)) <= a`.
//! 4. **No free liquidity**: join then exit of the minted shares returns
//!    at most the deposit.
//! 5. **Swap and reverse**: repeated A→B→A trades never extract value.
//! 6. **Reconciliation**: the fee ledger balances after any sequence.
//! 7. **Typed failure**: quotes, prices and invariant ratios at any
//!    magnitude return a value or an [`AmmError`], never a panic.
//! 8. **Dust round trips**: swapping 1 to 100 raw units and back never
//!    returns more than was sent.

#![allow(clippy::panic)]

use proptest::prelude::*;

use super::Pool;
use crate::config::{StableSwapConfig, WeightedConfig};
use crate::domain::{
    AccountId, Amount, AssetId, ExitRequest, FeeRate, JoinRequest, Shares, SwapRequest, Timestamp,
    TxContext, Weight,
};
use crate::error::AmmError;
use crate::traits::{FromConfig, InvariantEvaluator};

// -- helpers ------------------------------------------------------------------

const LP: AccountId = AccountId::from_index(1);
const TRADER: AccountId = AccountId::from_index(2);
const ADMIN: AccountId = AccountId::from_index(3);

fn asset(k: usize) -> AssetId {
    AssetId::from_index(u8::try_from(k + 1).unwrap_or(u8::MAX))
}

fn ctx(who: AccountId) -> TxContext {
    TxContext::new(who, Timestamp::new(0))
}

fn fee(bps: u32) -> FeeRate {
    let Ok(f) = FeeRate::new(bps) else {
        panic!("valid fee");
    };
    f
}

fn weighted_pool(weights: &[u32], fee_bps: u32) -> Pool {
    let assets: Vec<AssetId> = (0..weights.len()).map(asset).collect();
    let ws: Vec<Weight> = weights
        .iter()
        .map(|w| {
            let Ok(w) = Weight::new(*w) else {
                panic!("valid weight");
            };
            w
        })
        .collect();
    let Ok(cfg) = WeightedConfig::new(assets, ws, fee(fee_bps), ADMIN) else {
        panic!("valid weighted config");
    };
    let Ok(pool) = Pool::from_config(&cfg) else {
        panic!("valid weighted pool");
    };
    pool
}

fn stable_pool(n: usize, amp: u32, fee_bps: u32) -> Pool {
    let assets: Vec<AssetId> = (0..n).map(asset).collect();
    let Ok(cfg) = StableSwapConfig::new(assets, amp, fee(fee_bps), ADMIN) else {
        panic!("valid stableswap config");
    };
    let Ok(pool) = Pool::from_config(&cfg) else {
        panic!("valid stableswap pool");
    };
    pool
}

fn seed(mut pool: Pool, reserves: &[u128]) -> Pool {
    let amounts = reserves.iter().map(|r| Amount::new(*r)).collect();
    let Ok(_) = pool.join(&ctx(LP), &JoinRequest::new(amounts)) else {
        panic!("bootstrap join");
    };
    pool
}

// -- strategies -----------------------------------------------------------------

fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=1_000_000_000_000u128
}

/// Reserves of 18-decimal tokens held in the hundreds to trillions.
fn large_reserve_strategy() -> impl Strategy<Value = u128> {
    10u128.pow(20)..=10u128.pow(30)
}

/// Two-asset weight splits, including the equal-weight case.
fn weight_pair_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop_oneof![
        Just(vec![5_000, 5_000]),
        Just(vec![8_000, 2_000]),
        Just(vec![2_000, 8_000]),
        (100u32..=9_900).prop_map(|w| vec![w, 10_000 - w]),
    ]
}

/// Any of the pool shapes the crate supports, seeded with liquidity.
fn pool_strategy() -> impl Strategy<Value = Pool> {
    let weighted = (
        weight_pair_strategy(),
        reserve_strategy(),
        reserve_strategy(),
        0u32..=100,
    )
        .prop_map(|(w, r0, r1, f)| seed(weighted_pool(&w, f), &[r0, r1]));
    let three = (reserve_strategy(), 0u32..=100)
        .prop_map(|(r, f)| seed(weighted_pool(&[5_000, 3_000, 2_000], f), &[r, r / 2 + 1, r / 3 + 1]));
    let stable = (1u32..=2_000, 100_000u128..=1_000_000_000_000, 0u32..=50)
        .prop_map(|(amp, r, f)| seed(stable_pool(2, amp, f), &[r, r + r / 10]));
    let large_weighted = (
        weight_pair_strategy(),
        large_reserve_strategy(),
        large_reserve_strategy(),
        0u32..=100,
    )
        .prop_map(|(w, r0, r1, f)| seed(weighted_pool(&w, f), &[r0, r1]));
    let large_stable = (1u32..=2_000, 10u128.pow(20)..=10u128.pow(28), 0u32..=50)
        .prop_map(|(amp, r, f)| seed(stable_pool(2, amp, f), &[r, r + r / 10]));
    prop_oneof![
        3 => weighted,
        2 => three,
        2 => stable,
        1 => large_weighted,
        1 => large_stable,
    ]
}

/// Pools a few thousand to a million units deep, where dust trades still
/// move the price.
fn shallow_pool_strategy() -> impl Strategy<Value = Pool> {
    let weighted = (weight_pair_strategy(), 1_000u128..=1_000_000, 1_000u128..=1_000_000, 0u32..=100)
        .prop_map(|(w, r0, r1, f)| seed(weighted_pool(&w, f), &[r0, r1]));
    let stable = (1u32..=2_000, 1_000u128..=1_000_000, 0u32..=50)
        .prop_map(|(amp, r, f)| seed(stable_pool(2, amp, f), &[r, r + r / 10]));
    prop_oneof![weighted, stable]
}

/// Trade sizes from one raw unit to the whole `u128` range.
fn any_amount_strategy() -> impl Strategy<Value = u128> {
    prop_oneof![
        1u128..=1_000,
        1_000u128..=10u128.pow(24),
        10u128.pow(24)..=10u128.pow(36),
        any::<u128>(),
    ]
}

// -- properties -------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swaps_never_break_the_invariant(
        mut pool in pool_strategy(),
        trades in prop::collection::vec((0usize..3, 0usize..3, 1u128..=1_000), 1..16),
    ) {
        let n = pool.assets().len();
        for (i, j, per_mille) in trades {
            let (i, j) = (i % n, j % n);
            if i == j {
                continue;
            }
            let reserve_in = pool.reserves().get(i).map_or(0, |r| r.get());
            let amount = Amount::new((reserve_in * per_mille / 4_000).max(1));
            let before = pool.reserves().to_vec();
            match pool.swap(&ctx(TRADER), &SwapRequest::exact_in(asset(i), asset(j), amount)) {
                Ok(_) => {
                    prop_assert!(pool.kind().verify_swap(&before, pool.reserves()).is_ok());
                    if let ([b0, b1], [a0, a1], Some([w0, w1])) =
                        (before.as_slice(), pool.reserves(), pool.kind().weights())
                    {
                        if w0 == w1 {
                            prop_assert!(wide_mul(a0.get(), a1.get()) >= wide_mul(b0.get(), b1.get()));
                        }
                    }
                }
                Err(e) => prop_assert!(
                    !matches!(e, AmmError::InvariantViolation(_)),
                    "invariant violation from a priced swap: {e}"
                ),
            }
        }
        prop_assert!(pool.reconcile().is_ok());
    }

    #[test]
    fn prop_round_trip_never_asks_more(
        pool in pool_strategy(),
        per_mille in 1u128..=250,
    ) {
        let reserve_in = pool.reserves().first().map_or(0, |r| r.get());
        let a = Amount::new((reserve_in * per_mille / 1_000).max(1));
        let Ok(fwd) = pool.quote_swap(&SwapRequest::exact_in(asset(0), asset(1), a)) else {
            return Ok(());
        };
        let back = match pool.quote_swap(&SwapRequest::exact_out(asset(0), asset(1), fwd.amount_out)) {
            Ok(back) => back,
            // Steep weight ratios can price an output beyond the exact-out cap.
            Err(AmmError::SwapLimitExceeded(_)) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(format!("exact-out quote failed: {e}"))),
        };
        prop_assert!(back.amount_in <= a, "in_given_out {} > {}", back.amount_in, a);
    }

    #[test]
    fn prop_balanced_joins_keep_backing_per_share(
        mut pool in pool_strategy(),
        ops in prop::collection::vec((any::<bool>(), 1u128..=500), 1..24),
    ) {
        for (is_join, per_mille) in ops {
            let before = pool.reserves().to_vec();
            let t_before = pool.total_shares().get();
            if is_join {
                let amounts = before
                    .iter()
                    .map(|r| Amount::new(r.get() * per_mille / 1_000 + 1))
                    .collect();
                let _ = pool.join(&ctx(LP), &JoinRequest::new(amounts));
            } else {
                let held = pool.shares_of(&LP).get();
                let shares = Shares::new((held * per_mille / 1_000).max(1));
                if shares.get() >= t_before {
                    continue;
                }
                let _ = pool.exit(&ctx(LP), &ExitRequest::new(shares));
            }
            let t_after = pool.total_shares().get();
            for (r0, r1) in before.iter().zip(pool.reserves()) {
                // r1 / t_after >= r0 / t_before
                prop_assert!(
                    wide_mul(r1.get(), t_before) >= wide_mul(r0.get(), t_after),
                    "backing per share fell"
                );
            }
        }
        prop_assert!(pool.reconcile().is_ok());
    }

    #[test]
    fn prop_no_free_liquidity(
        mut pool in pool_strategy(),
        per_mille in 1u128..=2_000,
    ) {
        let amounts: Vec<Amount> = pool
            .reserves()
            .iter()
            .map(|r| Amount::new(r.get() * per_mille / 1_000 + 7))
            .collect();
        let Ok(joined) = pool.join(&ctx(TRADER), &JoinRequest::new(amounts.clone())) else {
            return Ok(());
        };
        let Ok(exited) = pool.exit(&ctx(TRADER), &ExitRequest::new(joined.shares)) else {
            return Err(TestCaseError::fail("exit of freshly minted shares failed"));
        };
        for ((out, used), deposited) in exited.amounts_out.iter().zip(&joined.amounts_used).zip(&amounts) {
            prop_assert!(out <= used);
            prop_assert!(out <= deposited);
        }
    }

    #[test]
    fn prop_single_asset_join_keeps_invariant_per_share(
        mut pool in pool_strategy(),
        per_mille in 1u128..=300,
    ) {
        let n = pool.assets().len();
        let before = pool.reserves().to_vec();
        let t_before = pool.total_shares().get();
        let mut amounts = vec![Amount::ZERO; n];
        if let Some(slot) = amounts.first_mut() {
            *slot = Amount::new(before.first().map_or(0, |r| r.get()) * per_mille / 1_000 + 1);
        }
        let Ok(q) = pool.join(&ctx(TRADER), &JoinRequest::new(amounts)) else {
            return Ok(());
        };
        let Ok(ratio) = pool.kind().invariant_ratio(&before, pool.reserves()) else {
            return Err(TestCaseError::fail("invariant ratio failed"));
        };
        // Shares grew by at most the invariant's growth.
        let minted_ratio = crate::math::mul_div(t_before + q.shares.get(), crate::math::WAD, t_before, crate::domain::Rounding::Down);
        prop_assert!(minted_ratio.is_ok_and(|m| m <= ratio));
        prop_assert!(pool.reconcile().is_ok());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_swap_and_reverse_never_profits(
        mut pool in pool_strategy(),
        per_mille in 1u128..=100,
    ) {
        let start = pool.reserves().first().map_or(0, |r| r.get()) * per_mille / 1_000 + 10;
        let mut balance_a = start;
        for _ in 0..128 {
            let Ok(there) = pool.swap(&ctx(TRADER), &SwapRequest::exact_in(asset(0), asset(1), Amount::new(balance_a))) else {
                break;
            };
            let Ok(back) = pool.swap(&ctx(TRADER), &SwapRequest::exact_in(asset(1), asset(0), there.amount_out)) else {
                break;
            };
            prop_assert!(back.amount_out.get() <= balance_a);
            balance_a = back.amount_out.get();
            if balance_a == 0 {
                break;
            }
        }
        prop_assert!(balance_a <= start);
        prop_assert!(pool.reconcile().is_ok());
    }

    #[test]
    fn prop_dust_round_trips_never_profit(
        mut pool in shallow_pool_strategy(),
        dust in prop::collection::vec(1u128..=100, 100..=160),
    ) {
        for a in dust {
            let Ok(there) = pool.swap(&ctx(TRADER), &SwapRequest::exact_in(asset(0), asset(1), Amount::new(a))) else {
                continue;
            };
            let Ok(back) = pool.swap(&ctx(TRADER), &SwapRequest::exact_in(asset(1), asset(0), there.amount_out)) else {
                continue;
            };
            prop_assert!(back.amount_out.get() <= a, "sent {a}, got back {}", back.amount_out);
        }
        prop_assert!(pool.reconcile().is_ok());
    }

    #[test]
    fn prop_books_reconcile_after_mixed_operations(
        mut pool in pool_strategy(),
        ops in prop::collection::vec((0u8..5, 1u128..=300), 1..40),
    ) {
        let n = pool.assets().len();
        for (step, (op, per_mille)) in ops.into_iter().enumerate() {
            let reserves = pool.reserves().to_vec();
            let scaled = |k: usize| Amount::new(reserves.get(k).map_or(0, |r| r.get()) * per_mille / 1_000 + 1);
            match op {
                0 => {
                    let (i, j) = (step % n, (step + 1) % n);
                    let _ = pool.swap(&ctx(TRADER), &SwapRequest::exact_in(asset(i), asset(j), scaled(i)));
                }
                1 => {
                    let (i, j) = ((step + 1) % n, step % n);
                    let out = Amount::new(scaled(j).get() / 4 + 1);
                    let _ = pool.swap(&ctx(TRADER), &SwapRequest::exact_out(asset(i), asset(j), out));
                }
                2 => {
                    let amounts = (0..n).map(scaled).collect();
                    let _ = pool.join(&ctx(LP), &JoinRequest::new(amounts));
                }
                3 => {
                    let shares = Shares::new(pool.shares_of(&LP).get() * per_mille / 1_000 + 1);
                    let _ = pool.exit(&ctx(LP), &ExitRequest::new(shares));
                }
                _ => {
                    let _ = pool.collect_fees(&ctx(ADMIN), ADMIN);
                }
            }
            prop_assert!(pool.reconcile().is_ok(), "books broke after op {op}");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_any_magnitude_fails_with_a_typed_error(
        pool in pool_strategy(),
        amount in any_amount_strategy(),
        side in 0usize..2,
    ) {
        let n = pool.assets().len();
        let (i, j) = (side, 1 - side);
        let a = Amount::new(amount);
        let reserve_out = pool.reserves().get(j).copied().unwrap_or(Amount::ZERO);

        if let Ok(q) = pool.quote_swap(&SwapRequest::exact_in(asset(i), asset(j), a)) {
            prop_assert!(q.amount_out < reserve_out);
        }
        if let Ok(q) = pool.quote_swap(&SwapRequest::exact_out(asset(i), asset(j), a)) {
            prop_assert!(q.amount_out == a && a < reserve_out);
        }
        let _ = pool.quote_join(&vec![a; n]);
        let mut single = vec![Amount::ZERO; n];
        if let Some(slot) = single.get_mut(i) {
            *slot = a;
        }
        let _ = pool.quote_join(&single);
        let _ = pool.spot_price(&asset(i), &asset(j));

        let before = pool.reserves().to_vec();
        let mut after = before.clone();
        if let Some(slot) = after.get_mut(i) {
            *slot = Amount::new(slot.get().saturating_add(amount));
        }
        if let Ok(ratio) = pool.kind().invariant_ratio(&before, &after) {
            prop_assert!(ratio >= crate::math::WAD / 2);
        }
    }
}

/// Widening multiply for ratio comparisons.
fn wide_mul(a: u128, b: u128) -> crate::math::U256 {
    crate::math::U256::from(a) * crate::math::U256::from(b)
}
