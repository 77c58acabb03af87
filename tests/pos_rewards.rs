//! Tests for issuance-cycle rewards and duplicate-sign report rewards.
//!
//! Run with: cargo test --test pos_rewards

mod common;

use common::{economic, genesis_json, id};
use ppos_econ::economics::rewards::year_reward;
use ppos_econ::economics::AnnualCycle;
use ppos_econ::node::InMemNode;
use ppos_econ::{EconError, Economic, Genesis};

const POOL: u128 = 262_215_742_000_000_000_000_000_000;

// ── Annual split ──────────────────────────────────────────────────────────

/// With one cycle of one block and one verifier the two halves rebuild the pool.
#[test]
fn test_half_rate_pays_out_whole_pool() {
    let annual = AnnualCycle { cycles_per_year: 1, blocks_per_year: 1 };
    let r = year_reward(POOL, 50, annual, 1).unwrap();
    let paid = r.block_reward + r.staking_reward;
    assert!(POOL - paid <= 2, "paid {paid} of {POOL}");
}

#[test]
fn test_odd_pool_truncates_both_halves() {
    let annual = AnnualCycle { cycles_per_year: 1, blocks_per_year: 1 };
    let r = year_reward(1_001, 50, annual, 1).unwrap();
    assert_eq!((r.block_reward, r.staking_reward), (500, 500));
}

#[test]
fn test_rate_is_exact_decimal() {
    // 0.33 and 0.67 have no exact binary representation.
    let annual = AnnualCycle { cycles_per_year: 1, blocks_per_year: 1 };
    let r = year_reward(100_000_000_000_000_000_000, 33, annual, 1).unwrap();
    assert_eq!(r.block_reward, 33_000_000_000_000_000_000);
    assert_eq!(r.staking_reward, 67_000_000_000_000_000_000);
}

#[test]
fn test_current_year_reward_uses_live_verifiers() {
    let econ = economic();
    let four = InMemNode::new(id(1)).with_verifiers([id(1), id(2), id(3), id(4)]);
    let two = InMemNode::new(id(1)).with_verifiers([id(1), id(2)]);

    let r4 = econ.current_year_reward(&four, POOL, None, None).unwrap();
    let r2 = econ.current_year_reward(&two, POOL, None, None).unwrap();

    assert_eq!(r4.block_reward, r2.block_reward, "block reward ignores verifier count");
    assert_eq!(r4.block_reward, POOL / 2 / 1680);
    assert_eq!(r2.staking_reward, POOL / 2 / 7 / 2);
    assert!(r4.staking_reward < r2.staking_reward);
}

#[test]
fn test_empty_verifier_list_is_an_error() {
    let econ = economic();
    let node = InMemNode::new(id(1));
    assert!(matches!(
        econ.current_year_reward(&node, POOL, None, None),
        Err(EconError::NoVerifiers)
    ));
}

#[test]
fn test_pool_read_from_chain_feeds_reward() {
    let econ = economic();
    let node = InMemNode::new(id(1))
        .with_height(1700)
        .with_verifiers([id(1)])
        .with_balance("0x1000000000000000000000000000000000000003", 1680, 1_680_000);
    let pool = econ.incentive_pool_amount(&node, "0x1000000000000000000000000000000000000003").unwrap();
    assert_eq!(pool, 1_680_000);
    let r = econ.current_year_reward(&node, pool, None, Some(100)).unwrap();
    assert_eq!((r.block_reward, r.staking_reward), (1_000, 0));
}

// ── Report reward ────────────────────────────────────────────────────────

#[test]
fn test_report_reward_reference_split() {
    let econ = economic();
    let r = econ.report_reward(10_000, Some(100), Some(50)).unwrap();
    assert_eq!(r.penalty_reward, 100);
    assert_eq!(r.proportion_reward, 50);
    assert_eq!(r.incentive_pool_reward, 50);
}

/// INVARIANT: reporter share + pool share == penalty.
#[test]
fn test_report_reward_conserves_penalty() {
    let econ = economic();
    for amount in [0u128, 1, 9_999, 10_001, 123_456_789, POOL] {
        for pct in [0u64, 1, 33, 50, 99, 100] {
            let r = econ.report_reward(amount, Some(137), Some(pct)).unwrap();
            assert_eq!(r.proportion_reward + r.incentive_pool_reward, r.penalty_reward);
            assert!(r.penalty_reward <= amount);
        }
    }
}

#[test]
fn test_report_ratio_bounds() {
    let econ = economic();
    assert!(matches!(
        econ.report_reward(1, Some(10_001), None),
        Err(EconError::OutOfRange { field: "penalty_ratio", .. })
    ));
    assert!(matches!(
        econ.report_reward(1, None, Some(101)),
        Err(EconError::OutOfRange { field: "proportion_ratio", .. })
    ));
}

#[test]
fn test_genesis_block_rate_is_the_default() {
    let json = genesis_json(10_000, 10, 4, 4, 28).replace("\"newBlockRate\": 50", "\"newBlockRate\": 20");
    let econ = Economic::new(Genesis::from_json(&json).unwrap()).unwrap();
    let node = InMemNode::new(id(1)).with_verifiers([id(1)]);
    let r = econ.current_year_reward(&node, 1_680_000, None, None).unwrap();
    // 20% of the pool over 1680 blocks, 80% over 7 cycles
    assert_eq!((r.block_reward, r.staking_reward), (200, 192_000));
}
