//! Block seal signer recovery.
//!
//! A block's `extraData` is 32 bytes of vanity followed by the producer's
//! 65-byte recoverable secp256k1 signature (`r || s || v`). The signed
//! message is keccak256 of the RLP list
//!
//!   [parentHash, miner, stateRoot, transactionsRoot, receiptsRoot,
//!    logsBloom, number, gasLimit, gasUsed, timestamp, extraData[..32], nonce]
//!
//! The recovered uncompressed public key, without its 0x04 tag, is the
//! producer's node id as it appears in the verifier list.

use crate::node::rpc::parse_quantity;
use crate::node::{NodeError, NodeId};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rlp::RlpStream;
use serde_json::Value;
use sha3::{Digest, Keccak256};

const VANITY_LEN: usize = 32;
const SEAL_LEN: usize = 65;

const HASH_FIELDS: [&str; 6] = ["parentHash", "miner", "stateRoot", "transactionsRoot", "receiptsRoot", "logsBloom"];
const QUANTITY_FIELDS: [&str; 4] = ["number", "gasLimit", "gasUsed", "timestamp"];

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut h = Keccak256::new();
    h.update(data);
    let r = h.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&r);
    out
}

fn bytes_field(block: &Value, name: &str) -> Result<Vec<u8>, NodeError> {
    let s = block
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| NodeError::Malformed(format!("block has no `{name}`")))?;
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|e| NodeError::Malformed(format!("block `{name}`: {e}")))
}

fn quantity_field(block: &Value, name: &str) -> Result<u64, NodeError> {
    let v = block
        .get(name)
        .ok_or_else(|| NodeError::Malformed(format!("block has no `{name}`")))?;
    let q = parse_quantity(v)?;
    u64::try_from(q).map_err(|_| NodeError::Malformed(format!("block `{name}` {q} out of range")))
}

fn extra_data(block: &Value) -> Result<Vec<u8>, NodeError> {
    let extra = bytes_field(block, "extraData")?;
    if extra.len() < VANITY_LEN + SEAL_LEN {
        return Err(NodeError::Malformed(format!("extraData is {} bytes, too short for a seal", extra.len())));
    }
    Ok(extra)
}

/// Hash the producer signs: the header with the seal stripped from `extraData`.
pub fn seal_hash(block: &Value) -> Result<[u8; 32], NodeError> {
    let extra = extra_data(block)?;
    let mut s = RlpStream::new_list(12);
    for name in HASH_FIELDS {
        s.append(&bytes_field(block, name)?.as_slice());
    }
    for name in QUANTITY_FIELDS {
        s.append(&quantity_field(block, name)?);
    }
    s.append(&&extra[..VANITY_LEN]);
    s.append(&bytes_field(block, "nonce")?.as_slice());
    Ok(keccak256(&s.out()))
}

/// Node id of the producer that sealed `block`.
pub fn seal_signer(block: &Value) -> Result<NodeId, NodeError> {
    let hash = seal_hash(block)?;
    let extra = extra_data(block)?;
    let seal = &extra[VANITY_LEN..VANITY_LEN + SEAL_LEN];

    let sig = Signature::from_slice(&seal[..64]).map_err(|e| NodeError::Malformed(format!("seal signature: {e}")))?;
    // 27/28 and 0/1 both occur
    let v = seal[64];
    let v = if v >= 27 { v - 27 } else { v };
    let rec_id = RecoveryId::from_byte(v).ok_or_else(|| NodeError::Malformed(format!("seal recovery id {v}")))?;

    let key = VerifyingKey::recover_from_prehash(&hash, &sig, rec_id)
        .map_err(|e| NodeError::Malformed(format!("seal recovery: {e}")))?;
    let point = key.to_encoded_point(false);
    Ok(NodeId(point.as_bytes()[1..].to_vec()))
}
