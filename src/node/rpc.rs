//! Blocking JSON-RPC node client.
//!
//! Uses `reqwest::blocking` so it can implement the synchronous `Node` trait
//! directly; waits in this crate are sleep-poll loops, not async tasks.
//!
//! Methods used:
//! - `eth_blockNumber`                 -> "0x.." height
//! - `eth_getBalance [addr, height]`   -> "0x.." amount
//! - `eth_getBlockByNumber [h, false]` -> block object; the producer's node
//!   id is recovered from the block seal (see `seal`), or read from a named
//!   block field when the chain exposes one
//! - verifier list method (configurable) -> `[{"NodeId": ..}, ..]`, or the
//!   staking-contract envelope `{"Code": 0, "Ret": [..]}`

use crate::config::NodeSection;
use crate::node::{seal, Node, NodeError, NodeId, Verifier};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

/// Where a block's producer identity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerSource {
    /// Signer recovered from the seal in `extraData`.
    Seal,
    /// Hex identity stored in the named block field.
    Field(String),
}

impl From<&str> for ProducerSource {
    fn from(s: &str) -> Self {
        match s {
            "" | "seal" => ProducerSource::Seal,
            field => ProducerSource::Field(field.to_string()),
        }
    }
}

pub struct RpcNode {
    url:             String,
    node_id:         NodeId,
    client:          Client,
    verifier_method: String,
    producer:        ProducerSource,
    next_id:         AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id:      u64,
    method:  &'a str,
    params:  Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error:  Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code:    i64,
    message: String,
}

impl RpcNode {
    pub fn connect(url: impl Into<String>, node_id: NodeId, timeout: Duration) -> Result<Self, NodeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            node_id,
            client,
            verifier_method: NodeSection::default().verifier_list_method,
            producer: ProducerSource::Seal,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(cfg: &NodeSection) -> anyhow::Result<Self> {
        let node_id: NodeId = cfg
            .node_id
            .parse()
            .map_err(|e| anyhow::anyhow!("node.node_id {:?}: {e}", cfg.node_id))?;
        let node = Self::connect(cfg.rpc_url.clone(), node_id, Duration::from_secs(cfg.rpc_timeout_s))?
            .with_verifier_method(cfg.verifier_list_method.clone())
            .with_producer_source(cfg.producer_field.as_str().into());
        Ok(node)
    }

    pub fn with_verifier_method(mut self, method: impl Into<String>) -> Self {
        self.verifier_method = method.into();
        self
    }

    pub fn with_producer_source(mut self, producer: ProducerSource) -> Self {
        self.producer = producer;
        self
    }

    fn producer_of(&self, height: u64, block: &Value) -> Result<NodeId, NodeError> {
        if block.is_null() {
            return Err(NodeError::MissingBlock(height));
        }
        match &self.producer {
            ProducerSource::Seal => seal::seal_signer(block),
            ProducerSource::Field(name) => block
                .get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| NodeError::Malformed(format!("block {height} has no `{name}`")))?
                .parse()
                .map_err(|e| NodeError::Malformed(format!("producer of block {height}: {e}"))),
        }
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, NodeError> {
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        trace!(url = %self.url, method, "rpc call");
        let resp: RpcResponse = self
            .client
            .post(&self.url)
            .json(&req)
            .send()?
            .error_for_status()?
            .json()?;
        if let Some(e) = resp.error {
            return Err(NodeError::Rpc { code: e.code, message: e.message });
        }
        Ok(resp.result.unwrap_or(Value::Null))
    }
}

/// Parse an RPC quantity ("0x1a"); plain decimal strings are accepted too.
pub fn parse_quantity(v: &Value) -> Result<u128, NodeError> {
    let s = v
        .as_str()
        .ok_or_else(|| NodeError::Malformed(format!("expected quantity string, got {v}")))?;
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| NodeError::Malformed(format!("quantity {s:?}: {e}")))
}

fn parse_verifiers(v: Value) -> Result<Vec<Verifier>, NodeError> {
    let list = match v {
        Value::Object(mut obj) => {
            if let Some(code) = obj.get("Code").and_then(Value::as_i64) {
                if code != 0 {
                    let message = obj.get("Ret").map(|r| r.to_string()).unwrap_or_default();
                    return Err(NodeError::Rpc { code, message });
                }
            }
            obj.remove("Ret").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(list).map_err(|e| NodeError::Malformed(format!("verifier list: {e}")))
}

impl Node for RpcNode {
    fn url(&self) -> &str {
        &self.url
    }

    fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    fn current_block_number(&self) -> Result<u64, NodeError> {
        let h = parse_quantity(&self.call("eth_blockNumber", json!([]))?)?;
        u64::try_from(h).map_err(|_| NodeError::Malformed(format!("block number {h} out of range")))
    }

    fn verifier_list(&self) -> Result<Vec<Verifier>, NodeError> {
        parse_verifiers(self.call(&self.verifier_method, json!([]))?)
    }

    fn block_producer_id(&self, height: u64) -> Result<NodeId, NodeError> {
        let block = self.call("eth_getBlockByNumber", json!([format!("{height:#x}"), false]))?;
        self.producer_of(height, &block)
    }

    fn balance_at(&self, address: &str, height: u64) -> Result<u128, NodeError> {
        parse_quantity(&self.call("eth_getBalance", json!([address, format!("{height:#x}")]))?)
    }
}
