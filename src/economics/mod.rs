//! Economic parameter calculator.
//!
//! `Economic` is built once per test environment from genesis and is
//! read-only afterwards. Query methods read the node's current height and
//! apply the pure arithmetic in `schedule` and `rewards`; wait methods
//! sleep-poll the node until a computed boundary is reached.

pub mod params;
pub mod rewards;
pub mod schedule;

use crate::error::EconError;
use crate::genesis::Genesis;
use crate::node::{wait_for_block, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub use params::{AnnualCycle, EconomicsParams};
pub use rewards::{ReportReward, YearReward};

/// Annual boundary relative to the node's current height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSwitchpoint {
    pub cycles_per_year: u64,
    pub blocks_per_year: u64,
    pub end_block:       u64,
}

#[derive(Debug, Clone)]
pub struct Economic {
    genesis: Genesis,
    params:  EconomicsParams,
    poll:    Duration,
}

impl Economic {
    pub fn new(genesis: Genesis) -> Result<Self, EconError> {
        genesis.validate()?;
        let params = EconomicsParams::from_genesis(&genesis)?;
        let poll = Duration::from_secs(params.interval);
        Ok(Self { genesis, params, poll })
    }

    /// Override the wait-loop poll period (defaults to one block interval).
    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    pub fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    pub fn params(&self) -> &EconomicsParams {
        &self.params
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll
    }

    pub fn annual_cycle_and_size(&self) -> AnnualCycle {
        self.params.annual_cycle_and_size()
    }

    /// Block and per-verifier staking reward for the current issuance cycle.
    ///
    /// `pool_amount` is the incentive pool balance at the start of the cycle;
    /// see `incentive_pool_amount`. `verifier_count` defaults to the node's
    /// live verifier list, `new_block_rate` to the genesis rate.
    pub fn current_year_reward<N: Node + ?Sized>(
        &self,
        node:           &N,
        pool_amount:    u128,
        verifier_count: Option<u64>,
        new_block_rate: Option<u64>,
    ) -> Result<YearReward, EconError> {
        let new_block_rate = new_block_rate.unwrap_or(self.genesis.economic_model.reward.new_block_rate);
        let verifier_count = match verifier_count {
            Some(n) => n,
            None => node.verifier_list()?.len() as u64,
        };
        rewards::year_reward(pool_amount, new_block_rate, self.annual_cycle_and_size(), verifier_count)
    }

    /// Incentive pool balance at the first block of the current issuance cycle.
    pub fn incentive_pool_amount<N: Node + ?Sized>(&self, node: &N, address: &str) -> Result<u128, EconError> {
        let size = self.params.blocks_per_year()?;
        let current = node.current_block_number()?;
        let cycle_start = current / size * size;
        let amount = node.balance_at(address, cycle_start)?;
        debug!(address, cycle_start, amount = %amount, "incentive pool read");
        Ok(amount)
    }

    pub fn settlement_switchpoint<N: Node + ?Sized>(&self, node: &N, cycles_ahead: u64) -> Result<u64, EconError> {
        let current = node.current_block_number()?;
        schedule::settlement_switchpoint(current, self.params.settlement_size, cycles_ahead)
            .ok_or(EconError::Overflow("settlement_switchpoint"))
    }

    /// First block of the settlement epoch `cycles_back` epochs before the
    /// current one; `None` if that epoch would start before genesis.
    pub fn front_settlement_switchpoint<N: Node + ?Sized>(
        &self,
        node:        &N,
        cycles_back: u64,
    ) -> Result<Option<u64>, EconError> {
        let switchpoint = self.settlement_switchpoint(node, 0)?;
        Ok(schedule::front_settlement_switchpoint(switchpoint, self.params.settlement_size, cycles_back))
    }

    pub fn consensus_switchpoint<N: Node + ?Sized>(&self, node: &N, rounds_ahead: u64) -> Result<u64, EconError> {
        let current = node.current_block_number()?;
        schedule::consensus_switchpoint(current, self.params.consensus_size, rounds_ahead)
            .ok_or(EconError::Overflow("consensus_switchpoint"))
    }

    pub fn annual_switchpoint<N: Node + ?Sized>(&self, node: &N) -> Result<AnnualSwitchpoint, EconError> {
        let annual = self.annual_cycle_and_size();
        let blocks_per_year = self.params.blocks_per_year()?;
        let current = node.current_block_number()?;
        let end_block = schedule::annual_switchpoint(current, blocks_per_year)
            .ok_or(EconError::Overflow("annual_switchpoint"))?;
        Ok(AnnualSwitchpoint { cycles_per_year: annual.cycles_per_year, blocks_per_year, end_block })
    }

    /// Wait for the end of the current settlement epoch plus `cycles_ahead` more.
    pub fn wait_settlement<N: Node + ?Sized>(&self, node: &N, cycles_ahead: u64) -> Result<u64, EconError> {
        let target = self.settlement_switchpoint(node, cycles_ahead)?;
        self.wait_until(node, target, "settlement")
    }

    /// Wait for the end of the current consensus round plus `rounds_ahead` more.
    pub fn wait_consensus<N: Node + ?Sized>(&self, node: &N, rounds_ahead: u64) -> Result<u64, EconError> {
        let target = self.consensus_switchpoint(node, rounds_ahead)?;
        self.wait_until(node, target, "consensus")
    }

    /// Wait for the next annual boundary strictly after the current height.
    pub fn wait_annual<N: Node + ?Sized>(&self, node: &N) -> Result<u64, EconError> {
        let blocks_per_year = self.params.blocks_per_year()?;
        let current = node.current_block_number()?;
        let target = schedule::annual_wait_target(current, blocks_per_year)
            .ok_or(EconError::Overflow("annual_wait_target"))?;
        self.wait_until(node, target, "annual")
    }

    fn wait_until<N: Node + ?Sized>(&self, node: &N, target: u64, boundary: &'static str) -> Result<u64, EconError> {
        info!(url = node.url(), boundary, target, "waiting for switchpoint");
        let reached = wait_for_block(node, target, self.poll_interval())?;
        info!(url = node.url(), boundary, target, reached, "switchpoint reached");
        Ok(reached)
    }

    /// Split of a duplicate-sign penalty between reporter and incentive pool.
    /// Ratios default to the genesis slashing parameters.
    pub fn report_reward(
        &self,
        amount:           u128,
        penalty_ratio:    Option<u64>,
        proportion_ratio: Option<u64>,
    ) -> Result<ReportReward, EconError> {
        let slashing = &self.genesis.economic_model.slashing;
        rewards::report_reward(
            amount,
            penalty_ratio.unwrap_or(slashing.slash_fraction_duplicate_sign),
            proportion_ratio.unwrap_or(slashing.duplicate_sign_report_reward),
        )
    }

    /// Blocks produced by `node` itself among the last
    /// `consensus_size * rounds - 1` blocks.
    pub fn validator_block_count<N: Node + ?Sized>(&self, node: &N, rounds: u64) -> Result<u64, EconError> {
        self.producer_block_count(node, node.node_id(), rounds)
    }

    /// Blocks produced by `producer` among the last `consensus_size * rounds - 1`
    /// blocks, walking back from the current height. Genesis is never counted.
    ///
    /// One producer lookup per block; meant for tests, not for hot paths.
    pub fn producer_block_count<N: Node + ?Sized>(
        &self,
        node:     &N,
        producer: &NodeId,
        rounds:   u64,
    ) -> Result<u64, EconError> {
        let window = self
            .params
            .consensus_size
            .checked_mul(rounds)
            .ok_or(EconError::Overflow("block count window"))?
            .saturating_sub(1);
        let current = node.current_block_number()?;
        let lowest = current.saturating_sub(window.saturating_sub(1)).max(1);

        let mut count = 0;
        if window > 0 {
            for height in (lowest..=current).rev() {
                if node.block_producer_id(height)? == *producer {
                    count += 1;
                }
            }
        }
        debug!(producer = %producer, rounds, window, from = lowest, to = current, count, "producer block count");
        Ok(count)
    }
}
