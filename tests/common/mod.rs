#![allow(dead_code)]

use ppos_econ::node::NodeId;
use ppos_econ::{Economic, Genesis};
use std::time::Duration;

/// Genesis JSON with the given timing knobs; everything else fixed.
pub fn genesis_json(period_ms: u64, per_round: u64, validators: u64, epoch_minutes: u64, cycle_minutes: u64) -> String {
    format!(
        r#"{{
  "config": {{ "chainId": 100, "cbft": {{ "period": {period_ms}, "amount": {per_round} }} }},
  "economicModel": {{
    "common": {{ "maxEpochMinutes": {epoch_minutes}, "maxConsensusVals": {validators}, "additionalCycleTime": {cycle_minutes} }},
    "staking": {{ "stakeThreshold": "1000000000000000000000000", "operatingThreshold": 10000000000000000000, "unStakeFreezeDuration": 2 }},
    "slashing": {{ "slashFractionDuplicateSign": 10, "duplicateSignReportReward": 50, "slashBlocksReward": 20 }},
    "gov": {{ "paramProposalVoteDurationSeconds": 1600, "textProposalVoteDurationSeconds": 160 }},
    "reward": {{ "newBlockRate": 50 }}
  }}
}}"#
    )
}

/// 1s blocks, 10 per round, 4 validators, 4-minute epochs, 28-minute cycles:
/// consensus 40, settlement 240, 7 cycles / 1680 blocks per year.
pub fn economic() -> Economic {
    let genesis = Genesis::from_json(&genesis_json(10_000, 10, 4, 4, 28)).unwrap();
    Economic::new(genesis).unwrap().with_poll_interval(Duration::ZERO)
}

pub fn id(b: u8) -> NodeId {
    NodeId(vec![b; 4])
}
