use crate::node::NodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EconError {
    #[error("genesis parameter `{0}` must be non-zero")]
    ZeroParameter(&'static str),
    #[error("derived parameter `{0}` is zero for this genesis timing")]
    DegenerateSchedule(&'static str),
    #[error("arithmetic overflow computing `{0}`")]
    Overflow(&'static str),
    #[error("`{field}` = {value} exceeds {max}")]
    OutOfRange { field: &'static str, value: u64, max: u64 },
    #[error("no verifiers to split the staking reward across")]
    NoVerifiers,
    #[error("node: {0}")]
    Node(#[from] NodeError),
}
