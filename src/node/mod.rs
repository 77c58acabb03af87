//! Node access.
//!
//! The calculator never talks to a chain directly; it goes through the
//! `Node` trait. `RpcNode` implements it over JSON-RPC, `InMemNode` over a
//! scripted in-memory chain for tests.

pub mod inmem;
pub mod rpc;
pub mod seal;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub use inmem::InMemNode;
pub use rpc::RpcNode;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed rpc response: {0}")]
    Malformed(String),
    #[error("no block at height {0}")]
    MissingBlock(u64),
}

/// Validator identity (node public key bytes).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub Vec<u8>);

impl FromStr for NodeId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        hex::decode(s).map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Entry of the current verifier list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verifier {
    #[serde(rename = "NodeId")]
    pub node_id: NodeId,
    #[serde(rename = "BenefitAddress", default, skip_serializing_if = "Option::is_none")]
    pub benefit_address: Option<String>,
}

pub trait Node {
    /// Endpoint the node is reached at; keys block-producer lookups.
    fn url(&self) -> &str;
    /// Identity this node produces blocks under.
    fn node_id(&self) -> &NodeId;
    fn current_block_number(&self) -> Result<u64, NodeError>;
    fn verifier_list(&self) -> Result<Vec<Verifier>, NodeError>;
    /// Identity that produced the block at `height`.
    fn block_producer_id(&self, height: u64) -> Result<NodeId, NodeError>;
    /// Balance of `address` as of block `height`.
    fn balance_at(&self, address: &str, height: u64) -> Result<u128, NodeError>;
}

/// Block until the node reports a height `>= height`, polling every `poll`.
///
/// There is no timeout: a stalled chain blocks the caller until it advances,
/// so callers impose their own test deadline. Returns the observed height.
pub fn wait_for_block<N: Node + ?Sized>(node: &N, height: u64, poll: Duration) -> Result<u64, NodeError> {
    loop {
        let current = node.current_block_number()?;
        if current >= height {
            debug!(url = node.url(), target = height, current, "wait reached target");
            return Ok(current);
        }
        debug!(url = node.url(), target = height, current, remaining = height - current, "waiting for block");
        std::thread::sleep(poll);
    }
}
