use crate::error::EconError;
use crate::genesis::Genesis;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Issuance cycle expressed in settlement epochs and in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualCycle {
    pub cycles_per_year: u64,
    pub blocks_per_year: u64,
}

/// Schedule and staking parameters derived from genesis.
///
/// Every quotient is a floor division taken in the same order the chain
/// takes it: `consensus_size` is built from the already-floored `interval`,
/// never from `period * validators / 1000`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicsParams {
    pub per_round_blocks:          u64,
    /// Seconds between blocks.
    pub interval:                  u64,
    pub validator_count:           u64,
    /// Blocks per consensus round.
    pub consensus_size:            u64,
    /// Consensus rounds per settlement epoch.
    pub consensus_wheel:           u64,
    /// Blocks per settlement epoch.
    pub settlement_size:           u64,
    pub additional_cycle_time:     u64,
    pub pp_vote_settlement_wheel:  u64,
    pub tp_vote_settlement_wheel:  u64,
    pub create_staking_limit:      u128,
    pub add_staking_limit:         u128,
    pub delegate_limit:            u128,
    pub unstaking_freeze_duration: u64,
    pub slash_blocks_reward:       u64,
    pub annual:                    AnnualCycle,
}

impl EconomicsParams {
    pub fn from_genesis(genesis: &Genesis) -> Result<Self, EconError> {
        let cbft = &genesis.config.cbft;
        let em = &genesis.economic_model;

        let per_round_blocks = nonzero("cbft.amount", cbft.amount)?;
        let validator_count = nonzero("maxConsensusVals", em.common.max_consensus_vals)?;

        let interval = cbft.period / per_round_blocks / 1000;
        if interval == 0 {
            return Err(EconError::DegenerateSchedule("interval"));
        }

        let consensus_size = checked("consensus_size", interval.checked_mul(per_round_blocks))?;
        let consensus_size = checked("consensus_size", consensus_size.checked_mul(validator_count))?;

        let epoch_seconds = checked("maxEpochMinutes", em.common.max_epoch_minutes.checked_mul(60))?;
        let consensus_wheel = epoch_seconds / consensus_size;
        if consensus_wheel == 0 {
            return Err(EconError::DegenerateSchedule("consensus_wheel"));
        }
        let settlement_size = checked("settlement_size", consensus_wheel.checked_mul(consensus_size))?;

        let cycle_seconds = checked("additionalCycleTime", em.common.additional_cycle_time.checked_mul(60))?;
        // zero when the issuance cycle is shorter than one epoch; only the
        // annual operations need it
        let cycles_per_year = cycle_seconds / settlement_size;
        let blocks_per_year = checked("blocks_per_year", cycles_per_year.checked_mul(settlement_size))?;

        info!(
            interval,
            consensus_size,
            consensus_wheel,
            settlement_size,
            cycles_per_year,
            blocks_per_year,
            "economic schedule derived"
        );

        Ok(Self {
            per_round_blocks,
            interval,
            validator_count,
            consensus_size,
            consensus_wheel,
            settlement_size,
            additional_cycle_time:     em.common.additional_cycle_time,
            pp_vote_settlement_wheel:  em.gov.param_proposal_vote_duration_seconds / settlement_size,
            tp_vote_settlement_wheel:  em.gov.text_proposal_vote_duration_seconds / consensus_size,
            create_staking_limit:      em.staking.stake_threshold,
            add_staking_limit:         em.staking.operating_threshold,
            delegate_limit:            em.staking.operating_threshold,
            unstaking_freeze_duration: em.staking.unstake_freeze_duration,
            slash_blocks_reward:       em.slashing.slash_blocks_reward,
            annual: AnnualCycle { cycles_per_year, blocks_per_year },
        })
    }

    /// `(cycles_per_year, blocks_per_year)` of the issuance cycle.
    pub fn annual_cycle_and_size(&self) -> AnnualCycle {
        self.annual
    }

    /// Blocks per issuance cycle, for callers that divide by it.
    pub fn blocks_per_year(&self) -> Result<u64, EconError> {
        match self.annual.blocks_per_year {
            0 => Err(EconError::DegenerateSchedule("cycles_per_year")),
            n => Ok(n),
        }
    }
}

fn nonzero(field: &'static str, v: u64) -> Result<u64, EconError> {
    if v == 0 {
        return Err(EconError::ZeroParameter(field));
    }
    Ok(v)
}

fn checked(field: &'static str, v: Option<u64>) -> Result<u64, EconError> {
    v.ok_or(EconError::Overflow(field))
}
