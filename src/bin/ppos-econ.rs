//! ppos-econ: derived economic parameters for a running PPoS test chain.
//!
//! Commands:
//!   params                       Derived schedule and staking parameters
//!   reward                       Block / staking reward of the current issuance cycle
//!   report <amount>              Duplicate-sign penalty split
//!   switchpoint <kind> [-n N]    settlement | front | consensus | annual boundary
//!   wait <kind> [-n N]           Block until a settlement | consensus | annual boundary
//!   block-count [--rounds N]     Blocks produced by a validator in the last rounds
//!   init-config [path]           Write an example config file

use clap::{Parser, Subcommand, ValueEnum};
use ppos_econ::config::HarnessConfig;
use ppos_econ::node::{NodeId, RpcNode};
use ppos_econ::{Economic, Genesis};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ppos-econ", version, about = "PPoS economic parameter calculator")]
struct Args {
    /// Path to TOML config file (CLI flags override file values)
    #[arg(long, default_value = "ppos-econ.toml")]
    config: String,
    /// Node JSON-RPC endpoint
    #[arg(long)]
    rpc: Option<String>,
    /// Hex identity of the node under test
    #[arg(long)]
    node_id: Option<String>,
    /// Genesis JSON file
    #[arg(long)]
    genesis: Option<String>,
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    Params,
    Reward {
        /// Pool amount; read from the incentive pool account when omitted
        #[arg(long)]
        pool: Option<u128>,
        #[arg(long)]
        verifiers: Option<u64>,
        /// Block reward rate in percent
        #[arg(long)]
        rate: Option<u64>,
    },
    Report {
        amount: u128,
        /// Penalty in basis points
        #[arg(long)]
        penalty_bps: Option<u64>,
        /// Reporter share in percent
        #[arg(long)]
        proportion_pct: Option<u64>,
    },
    Switchpoint {
        kind: Boundary,
        #[arg(short, long, default_value_t = 0)]
        n: u64,
    },
    Wait {
        kind: Boundary,
        #[arg(short, long, default_value_t = 0)]
        n: u64,
    },
    BlockCount {
        #[arg(long, default_value_t = 1)]
        rounds: u64,
        /// Producer to count; the configured node id when omitted
        #[arg(long)]
        producer: Option<String>,
    },
    InitConfig {
        #[arg(default_value = "ppos-econ.toml")]
        path: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Boundary {
    Settlement,
    Front,
    Consensus,
    Annual,
}

fn print_json<T: Serialize>(v: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Cmd::InitConfig { path } = &args.cmd {
        HarnessConfig::write_example(path)?;
        println!("Wrote example {path}");
        return Ok(());
    }

    let mut cfg = HarnessConfig::load(&args.config)?;
    if let Some(v) = &args.rpc       { cfg.node.rpc_url = v.clone(); }
    if let Some(v) = &args.node_id   { cfg.node.node_id = v.clone(); }
    if let Some(v) = &args.genesis   { cfg.genesis.path = v.clone(); }
    if let Some(v) = &args.log_level { cfg.log.log_level = v.clone(); }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let genesis = Genesis::load(&cfg.genesis.path)?;
    let econ = Economic::new(genesis)?;
    info!(genesis = %cfg.genesis.path, "calculator ready");

    match args.cmd {
        Cmd::Params => print_json(econ.params()),
        Cmd::Report { amount, penalty_bps, proportion_pct } => {
            print_json(&econ.report_reward(amount, penalty_bps, proportion_pct)?)
        }
        Cmd::Reward { pool, verifiers, rate } => {
            let node = RpcNode::from_config(&cfg.node)?;
            let pool = match pool {
                Some(p) => p,
                None => econ.incentive_pool_amount(&node, &cfg.economics.incentive_pool_address)?,
            };
            print_json(&econ.current_year_reward(&node, pool, verifiers, rate)?)
        }
        Cmd::Switchpoint { kind, n } => {
            let node = RpcNode::from_config(&cfg.node)?;
            match kind {
                Boundary::Settlement => print_json(&econ.settlement_switchpoint(&node, n)?),
                Boundary::Front => print_json(&econ.front_settlement_switchpoint(&node, n)?),
                Boundary::Consensus => print_json(&econ.consensus_switchpoint(&node, n)?),
                Boundary::Annual => print_json(&econ.annual_switchpoint(&node)?),
            }
        }
        Cmd::Wait { kind, n } => {
            let node = RpcNode::from_config(&cfg.node)?;
            let reached = match kind {
                Boundary::Settlement => econ.wait_settlement(&node, n)?,
                Boundary::Consensus => econ.wait_consensus(&node, n)?,
                Boundary::Annual => econ.wait_annual(&node)?,
                Boundary::Front => anyhow::bail!("front switchpoints lie in the past; nothing to wait for"),
            };
            print_json(&reached)
        }
        Cmd::BlockCount { rounds, producer } => {
            let node = RpcNode::from_config(&cfg.node)?;
            let count = match producer {
                Some(p) => {
                    let id: NodeId = p.parse().map_err(|e| anyhow::anyhow!("--producer {p:?}: {e}"))?;
                    econ.producer_block_count(&node, &id, rounds)?
                }
                None => econ.validator_block_count(&node, rounds)?,
            };
            print_json(&count)
        }
        Cmd::InitConfig { .. } => Ok(()),
    }
}
