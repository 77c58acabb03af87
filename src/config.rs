//! TOML configuration for the harness tools.
//!
//! Loaded from --config path (default: ./ppos-econ.toml); a missing file
//! yields defaults. Environment variables (PPOS_ECON_*) override file values,
//! and CLI flags override both.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HarnessConfig {
    #[serde(default)]
    pub node: NodeSection,
    #[serde(default)]
    pub genesis: GenesisSection,
    #[serde(default)]
    pub economics: EconomicsSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeSection {
    /// JSON-RPC endpoint of the node under test.
    pub rpc_url: String,
    /// Hex identity the node signs blocks with.
    pub node_id: String,
    pub rpc_timeout_s: u64,
    /// RPC method returning the current verifier list.
    pub verifier_list_method: String,
    /// "seal" recovers the producer's node key from the block seal; any
    /// other value names a block field holding the producer identity.
    pub producer_field: String,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:6789".into(),
            node_id: "".into(),
            rpc_timeout_s: 10,
            verifier_list_method: "ppos_getVerifierList".into(),
            producer_field: "seal".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenesisSection {
    pub path: String,
}

impl Default for GenesisSection {
    fn default() -> Self {
        Self { path: "./genesis.json".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomicsSection {
    /// Account holding the reward pool for the current issuance cycle.
    pub incentive_pool_address: String,
}

impl Default for EconomicsSection {
    fn default() -> Self {
        Self { incentive_pool_address: "0x1000000000000000000000000000000000000003".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSection {
    pub log_level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self { log_level: "info".into() }
    }
}

impl HarnessConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut cfg = if Path::new(path).exists() {
            let s = std::fs::read_to_string(path)?;
            toml::from_str(&s)?
        } else {
            Self::default()
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Apply PPOS_ECON_* overrides from `lookup` (normally the process environment).
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(v) = lookup("PPOS_ECON_RPC_URL") { self.node.rpc_url = v; }
        if let Some(v) = lookup("PPOS_ECON_NODE_ID") { self.node.node_id = v; }
        if let Some(v) = lookup("PPOS_ECON_GENESIS") { self.genesis.path = v; }
        if let Some(v) = lookup("PPOS_ECON_LOG_LEVEL") { self.log.log_level = v; }
        if let Some(v) = lookup("PPOS_ECON_INCENTIVE_POOL") { self.economics.incentive_pool_address = v; }
    }

    pub fn example_toml() -> &'static str {
        r#"# ppos-econ configuration
# All values shown are defaults.

[node]
rpc_url = "http://127.0.0.1:6789"
node_id = ""                        # hex node public key of the node under test
rpc_timeout_s = 10
verifier_list_method = "ppos_getVerifierList"
producer_field = "seal"             # "seal" or a block field carrying the producer identity

[genesis]
path = "./genesis.json"

[economics]
incentive_pool_address = "0x1000000000000000000000000000000000000003"

[log]
log_level = "info"                  # trace | debug | info | warn | error
"#
    }

    pub fn write_example(path: &str) -> std::io::Result<()> {
        std::fs::write(path, Self::example_toml())
    }
}
