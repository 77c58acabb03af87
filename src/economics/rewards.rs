//! Reward splits for one issuance cycle and for duplicate-sign reports.
//!
//! Annual split, for a pool `P` and block rate `r` percent:
//!   block_reward   = P * r/100       / blocks_per_year
//!   staking_reward = P * (1 - r/100) / cycles_per_year / verifiers
//!
//! Report split, for a slashed amount `A`:
//!   penalty        = A * slash_bps/10_000
//!   whistleblower  = penalty * report_pct/100
//!   incentive_pool = penalty - whistleblower
//!
//! Token amounts reach 1e26 and beyond, so every intermediate is an exact
//! base-10 `BigDecimal`; each result is truncated toward zero once, at the end.

use crate::economics::params::AnnualCycle;
use crate::error::EconError;
use crate::genesis::{check_max, BASIS_POINTS, PERCENT};
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-block and per-verifier reward for the current issuance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReward {
    pub block_reward:   u128,
    pub staking_reward: u128,
}

/// Duplicate-sign penalty and how it is shared out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportReward {
    pub penalty_reward:        u128,
    /// Paid to the reporter.
    pub proportion_reward:     u128,
    /// Returned to the incentive pool.
    pub incentive_pool_reward: u128,
}

fn dec(v: u128) -> BigDecimal {
    BigDecimal::new(BigInt::from(v), 0)
}

fn ratio(numer: u64, denom: u64) -> BigDecimal {
    BigDecimal::new(BigInt::from(numer), 0) / BigDecimal::new(BigInt::from(denom), 0)
}

fn truncate(v: BigDecimal, what: &'static str) -> Result<u128, EconError> {
    let (int, _) = v.with_scale_round(0, RoundingMode::Down).into_bigint_and_exponent();
    int.to_u128().ok_or(EconError::Overflow(what))
}

pub fn year_reward(
    pool_amount:    u128,
    new_block_rate: u64,
    annual:         AnnualCycle,
    verifier_count: u64,
) -> Result<YearReward, EconError> {
    check_max("new_block_rate", new_block_rate, PERCENT)?;
    if verifier_count == 0 {
        return Err(EconError::NoVerifiers);
    }
    if annual.cycles_per_year == 0 || annual.blocks_per_year == 0 {
        return Err(EconError::DegenerateSchedule("cycles_per_year"));
    }

    let block_share = ratio(new_block_rate, PERCENT);
    let staking_share = dec(1) - block_share.clone();

    let block_reward = dec(pool_amount) * block_share / dec(annual.blocks_per_year as u128);
    let staking_reward = dec(pool_amount) * staking_share
        / dec(annual.cycles_per_year as u128)
        / dec(verifier_count as u128);

    let reward = YearReward {
        block_reward:   truncate(block_reward, "block_reward")?,
        staking_reward: truncate(staking_reward, "staking_reward")?,
    };
    debug!(
        pool = %pool_amount,
        new_block_rate,
        verifier_count,
        block_reward = %reward.block_reward,
        staking_reward = %reward.staking_reward,
        "year reward computed"
    );
    Ok(reward)
}

pub fn report_reward(
    amount:           u128,
    penalty_ratio:    u64,
    proportion_ratio: u64,
) -> Result<ReportReward, EconError> {
    check_max("penalty_ratio", penalty_ratio, BASIS_POINTS)?;
    check_max("proportion_ratio", proportion_ratio, PERCENT)?;

    let penalty_reward = truncate(dec(amount) * ratio(penalty_ratio, BASIS_POINTS), "penalty_reward")?;
    let proportion_reward = truncate(
        dec(penalty_reward) * ratio(proportion_ratio, PERCENT),
        "proportion_reward",
    )?;

    Ok(ReportReward {
        penalty_reward,
        proportion_reward,
        incentive_pool_reward: penalty_reward - proportion_reward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: u128 = 262_215_742_000_000_000_000_000_000;

    fn annual(cycles: u64, size: u64) -> AnnualCycle {
        AnnualCycle { cycles_per_year: cycles, blocks_per_year: cycles * size }
    }

    #[test]
    fn report_reward_splits_penalty() {
        let r = report_reward(10_000, 100, 50).unwrap();
        assert_eq!(r.penalty_reward, 100);
        assert_eq!(r.proportion_reward, 50);
        assert_eq!(r.incentive_pool_reward, 50);
    }

    #[test]
    fn report_reward_truncates_each_stage() {
        // 999 * 10/10000 = 0.999 -> 0
        let r = report_reward(999, 10, 50).unwrap();
        assert_eq!(r, ReportReward { penalty_reward: 0, proportion_reward: 0, incentive_pool_reward: 0 });
        // penalty 3, half of it 1.5 -> 1, pool keeps 2
        let r = report_reward(30_000, 1, 50).unwrap();
        assert_eq!((r.penalty_reward, r.proportion_reward, r.incentive_pool_reward), (3, 1, 2));
    }

    #[test]
    fn single_cycle_single_verifier_pays_out_the_pool() {
        let r = year_reward(POOL, 50, annual(1, 240), 1).unwrap();
        let paid = r.block_reward * 240 + r.staking_reward;
        assert!(POOL - paid <= 240, "paid {paid} of {POOL}");
        assert_eq!(r.staking_reward, POOL / 2);
    }

    #[test]
    fn year_reward_is_exact_on_large_amounts() {
        // 262215742e18 * 0.5 / 1680 = 78040399404761904761904.76...
        let r = year_reward(POOL, 50, annual(7, 240), 4).unwrap();
        assert_eq!(r.block_reward, 78_040_399_404_761_904_761_904);
        // 262215742e18 * 0.5 / 7 / 4 = 4682423964285714285714285.71...
        assert_eq!(r.staking_reward, POOL / 2 / 7 / 4);
    }

    #[test]
    fn full_block_rate_leaves_nothing_for_stakers() {
        let r = year_reward(POOL, 100, annual(7, 240), 4).unwrap();
        assert_eq!(r.staking_reward, 0);
        assert_eq!(r.block_reward, POOL / 1680);
    }

    #[test]
    fn zero_verifiers_is_an_error() {
        assert!(matches!(year_reward(POOL, 50, annual(7, 240), 0), Err(EconError::NoVerifiers)));
    }

    #[test]
    fn rate_over_100_is_an_error() {
        assert!(matches!(
            year_reward(POOL, 101, annual(7, 240), 4),
            Err(EconError::OutOfRange { field: "new_block_rate", .. })
        ));
    }
}
