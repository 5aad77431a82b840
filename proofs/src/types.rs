use serde::{Deserialize, Serialize};

use crate::error::{ProofError, Result};
use crate::hash::Digest;

/// Everything a verifier needs to accept that a segwit transaction is
/// buried in a (synthetic) block.
///
/// All digests are in internal byte order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// The raw segwit transaction being proven
    pub segwit_tx: Vec<u8>,
    /// `hash256(segwit_tx)`
    pub txid: Digest,
    /// Position of the transaction in the witness tree
    pub tx_index: u64,
    /// Number of hashing levels from leaves to root
    pub tree_depth: u64,
    /// Sibling path of the transaction in the witness tree
    pub segwit_proof: Vec<Digest>,
    pub witness_merkle_root: Digest,
    pub witness_reserved_value: Digest,
    /// Coinbase transaction carrying the witness commitment
    pub coinbase_tx: Vec<u8>,
    pub coinbase_txid: Digest,
    /// Sibling path of the coinbase (slot 0) in the block tree
    pub coinbase_proof: Vec<Digest>,
    pub merkle_root: Digest,
    /// 80-byte header carrying `merkle_root`
    pub block_header: Vec<u8>,
}

impl ProofBundle {
    /// Serialize to CBOR format for efficient storage
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        ciborium::into_writer(self, &mut buffer)
            .map_err(|e| ProofError::Serialization(format!("CBOR serialization failed: {}", e)))?;
        Ok(buffer)
    }

    /// Deserialize from CBOR format
    pub fn from_cbor(data: &[u8]) -> Result<Self> {
        ciborium::from_reader(data)
            .map_err(|e| ProofError::Serialization(format!("CBOR deserialization failed: {}", e)))
    }
}
