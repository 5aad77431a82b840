//! Synthetic coinbase transaction and block header.

use bitcoin::block::Header;

use crate::error::{ProofError, Result};
use crate::hash::{hash256, Digest};
use crate::segwit::{extract_witness_commitment, WITNESS_COMMITMENT_LEN};

/// Raw coinbase bytes preceding the commitment script: version 1, one input
/// spending the null outpoint, a P2WPKH subsidy output, then the zero-value
/// commitment output's value and script length (0x26).
const COINBASE_PREFIX: [u8; 117] = [
    0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0xff, 0x1e, 0x03, 0x83, 0xa0, 0x25, 0x19, 0x44,
    0x4d, 0x47, 0x42, 0x6c, 0x6f, 0x63, 0x6b, 0x63, 0x68, 0x61, 0x69, 0x6e,
    0x30, 0x9e, 0x3c, 0x09, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xff, 0xff, 0xff, 0xff, 0x02, 0x9e, 0x49, 0x25, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x16, 0x00, 0x14, 0xb2, 0x37, 0x16, 0xe1, 0x83, 0xba, 0x09, 0x49,
    0xc5, 0x5d, 0x6c, 0xac, 0x21, 0xa3, 0xe9, 0x41, 0x76, 0xee, 0xd1, 0x12,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x26,
];

/// Raw coinbase bytes following the commitment script: a single 32-byte
/// witness reserved value and a zero locktime.
const COINBASE_SUFFIX: [u8; 38] = [
    0x01, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Byte offset of the merkle root inside an 80-byte header.
pub const HEADER_MERKLE_ROOT_OFFSET: usize = 36;

pub const BLOCK_HEADER_LEN: usize = 80;

/// Substitutes a witness commitment script into the coinbase template.
pub fn build_coinbase(commitment: &[u8]) -> Result<Vec<u8>> {
    if commitment.len() != WITNESS_COMMITMENT_LEN {
        return Err(ProofError::InvalidArgument(format!(
            "witness commitment must be {} bytes, got {}",
            WITNESS_COMMITMENT_LEN,
            commitment.len()
        )));
    }

    let mut coinbase =
        Vec::with_capacity(COINBASE_PREFIX.len() + WITNESS_COMMITMENT_LEN + COINBASE_SUFFIX.len());
    coinbase.extend_from_slice(&COINBASE_PREFIX);
    coinbase.extend_from_slice(commitment);
    coinbase.extend_from_slice(&COINBASE_SUFFIX);
    Ok(coinbase)
}

/// Returns the witness commitment carried by a coinbase built from the template.
pub fn coinbase_commitment(coinbase: &[u8]) -> Option<Digest> {
    let start = COINBASE_PREFIX.len();
    coinbase
        .get(start..start + WITNESS_COMMITMENT_LEN)
        .and_then(extract_witness_commitment)
}

/// Builds an 80-byte header carrying `merkle_root`; every other field is zero.
pub fn build_block_header(merkle_root: &Digest) -> [u8; BLOCK_HEADER_LEN] {
    let mut header = [0u8; BLOCK_HEADER_LEN];
    header[HEADER_MERKLE_ROOT_OFFSET..HEADER_MERKLE_ROOT_OFFSET + 32].copy_from_slice(merkle_root);
    header
}

/// Reads the merkle root back out of a header.
pub fn header_merkle_root(header: &[u8; BLOCK_HEADER_LEN]) -> Digest {
    let mut root = [0u8; 32];
    root.copy_from_slice(&header[HEADER_MERKLE_ROOT_OFFSET..HEADER_MERKLE_ROOT_OFFSET + 32]);
    root
}

/// Double-SHA-256 of the header, internal byte order.
pub fn block_header_hash(header: &[u8; BLOCK_HEADER_LEN]) -> Digest {
    hash256(header)
}

/// Header hash in the byte-reversed order block explorers display.
pub fn block_header_hash_hex(header: &[u8; BLOCK_HEADER_LEN]) -> Result<String> {
    let header: Header = bitcoin::consensus::deserialize(header)
        .map_err(|e| ProofError::Serialization(format!("block header: {}", e)))?;
    Ok(header.block_hash().to_string())
}
