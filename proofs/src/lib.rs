//! Bitcoin SPV proof generation for segwit transactions.
//!
//! Given a raw segwit transaction, synthesizes a block around it (witness
//! tree, coinbase with a BIP-141 commitment, block tree, 80-byte header)
//! and returns the inclusion proofs a verifier needs, without a node.

pub mod block;
pub mod error;
pub mod hash;
pub mod ids;
pub mod merkle;
pub mod proof;
pub mod segwit;
pub mod types;

pub use block::{block_header_hash, block_header_hash_hex, build_block_header, build_coinbase};
pub use error::{ProofError, Result};
pub use hash::{hash256, to_display_hex, Digest};
pub use ids::{synthesize_ids, with_plain_override, with_witness_override, IdMode};
pub use merkle::{MerkleProof, MerkleTree};
pub use proof::generate_proof;
pub use segwit::{build_witness_commitment, WITNESS_RESERVED_VALUE};
pub use types::ProofBundle;
