//! In-memory chain for tests.
//!
//! Holds a scripted chain: a current height, the producer of each block, the
//! verifier list and account balances. Height queries can optionally advance
//! the chain so poll-waits terminate without a real node.

use crate::node::{Node, NodeError, NodeId, Verifier};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

pub struct InMemNode {
    url:     String,
    node_id: NodeId,
    inner:   Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    height:    u64,
    /// Blocks added after every height query.
    step:      u64,
    polls:     u64,
    verifiers: Vec<Verifier>,
    producers: BTreeMap<u64, NodeId>,
    /// (address, height) -> balance from that height on
    balances:  BTreeMap<(String, u64), u128>,
}

impl InMemNode {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            url: "inmem://node".into(),
            node_id,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_height(self, height: u64) -> Self {
        self.inner.lock().height = height;
        self
    }

    /// Advance the chain by `step` blocks after each height query.
    pub fn auto_advance(self, step: u64) -> Self {
        self.inner.lock().step = step;
        self
    }

    pub fn with_verifiers<I: IntoIterator<Item = NodeId>>(self, ids: I) -> Self {
        self.inner.lock().verifiers = ids
            .into_iter()
            .map(|node_id| Verifier { node_id, benefit_address: None })
            .collect();
        self
    }

    /// Record `producer` as the producer of every block in `heights`.
    pub fn produced(self, heights: RangeInclusive<u64>, producer: &NodeId) -> Self {
        {
            let mut inner = self.inner.lock();
            for h in heights {
                inner.producers.insert(h, producer.clone());
            }
        }
        self
    }

    pub fn with_balance(self, address: &str, from_height: u64, amount: u128) -> Self {
        self.inner.lock().balances.insert((address.to_string(), from_height), amount);
        self
    }

    pub fn set_height(&self, height: u64) {
        self.inner.lock().height = height;
    }

    pub fn height(&self) -> u64 {
        self.inner.lock().height
    }

    /// Number of height queries served so far.
    pub fn polls(&self) -> u64 {
        self.inner.lock().polls
    }
}

impl Node for InMemNode {
    fn url(&self) -> &str {
        &self.url
    }

    fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    fn current_block_number(&self) -> Result<u64, NodeError> {
        let mut inner = self.inner.lock();
        let h = inner.height;
        inner.polls += 1;
        inner.height += inner.step;
        Ok(h)
    }

    fn verifier_list(&self) -> Result<Vec<Verifier>, NodeError> {
        Ok(self.inner.lock().verifiers.clone())
    }

    fn block_producer_id(&self, height: u64) -> Result<NodeId, NodeError> {
        self.inner
            .lock()
            .producers
            .get(&height)
            .cloned()
            .ok_or(NodeError::MissingBlock(height))
    }

    fn balance_at(&self, address: &str, height: u64) -> Result<u128, NodeError> {
        let inner = self.inner.lock();
        let from = (address.to_string(), 0);
        let to = (address.to_string(), height);
        Ok(inner
            .balances
            .range(from..=to)
            .next_back()
            .map(|(_, amount)| *amount)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_is_latest_at_or_before_height() {
        let node = InMemNode::new(NodeId(vec![1]))
            .with_balance("pool", 0, 100)
            .with_balance("pool", 1680, 70)
            .with_balance("other", 10, 5);
        assert_eq!(node.balance_at("pool", 0).unwrap(), 100);
        assert_eq!(node.balance_at("pool", 1679).unwrap(), 100);
        assert_eq!(node.balance_at("pool", 5000).unwrap(), 70);
        assert_eq!(node.balance_at("other", 9).unwrap(), 0);
        assert_eq!(node.balance_at("missing", 9).unwrap(), 0);
    }

    #[test]
    fn unknown_block_has_no_producer() {
        let me = NodeId(vec![7]);
        let node = InMemNode::new(me.clone()).produced(1..=3, &me);
        assert_eq!(node.block_producer_id(2).unwrap(), me);
        assert!(matches!(node.block_producer_id(4), Err(NodeError::MissingBlock(4))));
    }

    #[test]
    fn height_query_advances_when_configured() {
        let node = InMemNode::new(NodeId(vec![1])).with_height(5).auto_advance(2);
        assert_eq!(node.current_block_number().unwrap(), 5);
        assert_eq!(node.current_block_number().unwrap(), 7);
        assert_eq!(node.height(), 9);
        assert_eq!(node.polls(), 2);
    }
}
