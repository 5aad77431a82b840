//! Builds a synthetic block around a segwit transaction and the two
//! inclusion proofs that tie it to the block header.

use tracing::{debug, info};

use crate::block::{
    build_block_header, build_coinbase, coinbase_commitment, header_merkle_root,
    BLOCK_HEADER_LEN,
};
use crate::error::{ProofError, Result};
use crate::hash::{hash256, Digest};
use crate::ids::{synthesize_ids, with_plain_override, with_witness_override, IdMode};
use crate::merkle::{MerkleProof, MerkleTree};
use crate::segwit::{build_witness_commitment, extract_witness_commitment, WITNESS_RESERVED_VALUE};
use crate::types::ProofBundle;

/// Generates the proof bundle for `segwit_tx` placed at `tx_index` in a block
/// of `tx_count` transactions.
///
/// With `randomize` the filler identifiers are drawn fresh for each tree;
/// otherwise the result is a pure function of the arguments.
pub fn generate_proof(segwit_tx: &[u8], tx_count: u64, tx_index: u64, randomize: bool) -> Result<ProofBundle> {
    if tx_index >= tx_count {
        return Err(ProofError::InvalidArgument(format!(
            "transaction index {} out of range for {} transactions",
            tx_index, tx_count
        )));
    }
    let mode = IdMode::from_randomize(randomize);

    // Witness tree: coinbase placeholder at 0, our transaction at tx_index.
    let txid = hash256(segwit_tx);
    let witness_ids = with_witness_override(synthesize_ids(tx_count, mode)?, &txid, tx_index)?;
    let witness_tree = MerkleTree::build(&witness_ids)?;
    let segwit_proof = witness_tree.proof_for(&txid)?;
    let witness_merkle_root = witness_tree.root();
    debug!(
        "Witness tree ready: root {}, {} siblings",
        hex::encode(witness_merkle_root),
        segwit_proof.len()
    );

    let commitment = build_witness_commitment(&witness_merkle_root, &WITNESS_RESERVED_VALUE);
    let coinbase_tx = build_coinbase(&commitment)?;
    let coinbase_txid = hash256(&coinbase_tx);

    // Block tree: coinbase at slot 0, independent filler.
    let block_ids = with_plain_override(synthesize_ids(tx_count, mode)?, &coinbase_txid, 0)?;
    let block_tree = MerkleTree::build(&block_ids)?;
    let coinbase_proof = block_tree.proof_for(&coinbase_txid)?;
    let merkle_root = block_tree.root();
    let block_header = build_block_header(&merkle_root);

    info!(
        "Generated proof for tx {} at index {} of {} (depth {})",
        hex::encode(txid),
        tx_index,
        tx_count,
        block_tree.depth()
    );

    Ok(ProofBundle {
        segwit_tx: segwit_tx.to_vec(),
        txid,
        tx_index,
        tree_depth: block_tree.depth() as u64,
        segwit_proof,
        witness_merkle_root,
        witness_reserved_value: WITNESS_RESERVED_VALUE,
        coinbase_tx,
        coinbase_txid,
        coinbase_proof,
        merkle_root,
        block_header: block_header.to_vec(),
    })
}

fn check(condition: bool, what: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ProofError::VerificationFailed(what.to_string()))
    }
}

impl ProofBundle {
    /// Witness-tree proof of the segwit transaction.
    pub fn segwit_merkle_proof(&self) -> MerkleProof {
        MerkleProof {
            txid: self.txid,
            leaf_index: self.tx_index,
            path: self.segwit_proof.clone(),
        }
    }

    /// Block-tree proof of the coinbase, always at slot 0.
    pub fn coinbase_merkle_proof(&self) -> MerkleProof {
        MerkleProof {
            txid: self.coinbase_txid,
            leaf_index: 0,
            path: self.coinbase_proof.clone(),
        }
    }

    /// The 80-byte header, or an error if the stored buffer has another length.
    pub fn header_bytes(&self) -> Result<[u8; BLOCK_HEADER_LEN]> {
        self.block_header.as_slice().try_into().map_err(|_| {
            ProofError::VerificationFailed(format!(
                "block header must be {} bytes, got {}",
                BLOCK_HEADER_LEN,
                self.block_header.len()
            ))
        })
    }

    /// Checks the chain transaction -> witness root -> coinbase commitment ->
    /// coinbase txid -> block merkle root -> header.
    pub fn verify(&self) -> Result<()> {
        check(hash256(&self.segwit_tx) == self.txid, "txid does not match transaction bytes")?;
        check(
            self.segwit_proof.len() as u64 == self.tree_depth,
            "witness proof length does not match tree depth",
        )?;
        check(
            self.segwit_merkle_proof().verify(&self.witness_merkle_root),
            "witness proof does not reach the witness merkle root",
        )?;

        let expected = build_witness_commitment(&self.witness_merkle_root, &self.witness_reserved_value);
        check(
            coinbase_commitment(&self.coinbase_tx) == extract_witness_commitment(&expected),
            "coinbase does not commit to the witness merkle root",
        )?;
        check(
            hash256(&self.coinbase_tx) == self.coinbase_txid,
            "coinbase txid does not match coinbase bytes",
        )?;

        check(
            self.coinbase_proof.len() as u64 == self.tree_depth,
            "coinbase proof length does not match tree depth",
        )?;
        check(
            self.coinbase_merkle_proof().verify(&self.merkle_root),
            "coinbase proof does not reach the merkle root",
        )?;
        check(
            self.header_merkle_root()? == self.merkle_root,
            "header does not carry the merkle root",
        )?;

        debug!("Proof bundle for {} verified", hex::encode(self.txid));
        Ok(())
    }

    /// Merkle root committed by the header.
    pub fn header_merkle_root(&self) -> Result<Digest> {
        Ok(header_merkle_root(&self.header_bytes()?))
    }
}
