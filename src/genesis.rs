//! Genesis model.
//!
//! Only the subset of the chain genesis file that drives reward and schedule
//! derivation is modelled; every other field is ignored on load.
//! Token amounts may be written either as JSON integers (any size) or as
//! decimal strings.

use crate::error::EconError;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Slashing fractions are expressed in basis points.
pub const BASIS_POINTS: u64 = 10_000;
/// Reward rates and report shares are expressed in percent.
pub const PERCENT: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    pub config: ChainConfig,
    pub economic_model: EconomicModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub cbft: CbftConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CbftConfig {
    /// Round period in milliseconds.
    pub period: u64,
    /// Blocks a validator produces per round.
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicModel {
    pub common: CommonSection,
    pub staking: StakingSection,
    pub slashing: SlashingSection,
    pub gov: GovSection,
    pub reward: RewardSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonSection {
    pub max_epoch_minutes: u64,
    pub max_consensus_vals: u64,
    /// Minutes per issuance ("annual") cycle.
    pub additional_cycle_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingSection {
    #[serde(deserialize_with = "de_amount")]
    pub stake_threshold: u128,
    #[serde(deserialize_with = "de_amount")]
    pub operating_threshold: u128,
    /// Settlement epochs a withdrawn stake stays frozen.
    #[serde(rename = "unStakeFreezeDuration")]
    pub unstake_freeze_duration: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlashingSection {
    /// Basis points of stake burnt on a duplicate-sign report.
    pub slash_fraction_duplicate_sign: u64,
    /// Percent of the penalty paid to the reporter.
    pub duplicate_sign_report_reward: u64,
    /// Block rewards forfeited by a low-production validator.
    pub slash_blocks_reward: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovSection {
    pub param_proposal_vote_duration_seconds: u64,
    pub text_proposal_vote_duration_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSection {
    /// Percent of the annual issuance paid out as block rewards.
    pub new_block_rate: u64,
}

fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
    use serde::de::Error;
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::Number(n) => n
            .to_string()
            .parse()
            .map_err(|_| D::Error::custom(format!("amount {n} is not a non-negative integer"))),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("amount {s:?} is not a non-negative integer"))),
        other => Err(D::Error::custom(format!("expected amount, got {other}"))),
    }
}

impl Genesis {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read genesis {}: {e}", path.display()))?;
        Self::from_json(&s)
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let g: Genesis = serde_json::from_str(s)?;
        g.validate()?;
        Ok(g)
    }

    /// Range checks on ratios. Divisor checks happen when the schedule is derived.
    pub fn validate(&self) -> Result<(), EconError> {
        let em = &self.economic_model;
        check_max("newBlockRate", em.reward.new_block_rate, PERCENT)?;
        check_max("duplicateSignReportReward", em.slashing.duplicate_sign_report_reward, PERCENT)?;
        check_max("slashFractionDuplicateSign", em.slashing.slash_fraction_duplicate_sign, BASIS_POINTS)?;
        Ok(())
    }
}

pub(crate) fn check_max(field: &'static str, value: u64, max: u64) -> Result<(), EconError> {
    if value > max {
        return Err(EconError::OutOfRange { field, value, max });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Four validators, ten blocks per one-second round slot, four-minute epochs.
    pub const GENESIS_JSON: &str = r#"{
        "config": {
            "chainId": 100,
            "cbft": { "period": 10000, "amount": 10, "validatorMode": "ppos" }
        },
        "economicModel": {
            "common": { "maxEpochMinutes": 4, "maxConsensusVals": 4, "additionalCycleTime": 28 },
            "staking": {
                "stakeThreshold": 1000000000000000000000000,
                "operatingThreshold": "10000000000000000000",
                "maxValidators": 25,
                "unStakeFreezeDuration": 2
            },
            "slashing": {
                "slashFractionDuplicateSign": 10,
                "duplicateSignReportReward": 50,
                "maxEvidenceAge": 1,
                "slashBlocksReward": 20
            },
            "gov": {
                "versionProposalVoteDurationSeconds": 1600,
                "textProposalVoteDurationSeconds": 160,
                "paramProposalVoteDurationSeconds": 1600
            },
            "reward": { "newBlockRate": 50, "platonFoundationYear": 10 }
        }
    }"#;
}
