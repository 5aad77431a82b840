//! BIP-141 witness commitment output script.

use crate::hash::{hash256, Digest};

/// `OP_RETURN`, push of 36 bytes, then the commitment header `aa21a9ed`.
pub const WITNESS_COMMITMENT_HEADER: [u8; 6] = [0x6a, 0x24, 0xaa, 0x21, 0xa9, 0xed];

/// Total size of a witness commitment script.
pub const WITNESS_COMMITMENT_LEN: usize = WITNESS_COMMITMENT_HEADER.len() + 32;

/// The witness reserved value used by every synthesized block.
pub const WITNESS_RESERVED_VALUE: Digest = [0u8; 32];

/// Builds `6a24aa21a9ed || hash256(witness_root || reserved)`.
pub fn build_witness_commitment(witness_root: &Digest, reserved: &Digest) -> [u8; WITNESS_COMMITMENT_LEN] {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(witness_root);
    preimage[32..].copy_from_slice(reserved);

    let mut script = [0u8; WITNESS_COMMITMENT_LEN];
    script[..WITNESS_COMMITMENT_HEADER.len()].copy_from_slice(&WITNESS_COMMITMENT_HEADER);
    script[WITNESS_COMMITMENT_HEADER.len()..].copy_from_slice(&hash256(&preimage));
    script
}

/// Extract the committed hash from a witness commitment script
pub fn extract_witness_commitment(script: &[u8]) -> Option<Digest> {
    if script.len() < WITNESS_COMMITMENT_LEN || !script.starts_with(&WITNESS_COMMITMENT_HEADER) {
        return None;
    }
    let mut commitment = [0u8; 32];
    commitment.copy_from_slice(&script[WITNESS_COMMITMENT_HEADER.len()..WITNESS_COMMITMENT_LEN]);
    Some(commitment)
}
