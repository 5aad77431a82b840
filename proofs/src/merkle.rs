use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProofError, Result};
use crate::hash::{hash_pair, Digest};

/// A Merkle proof path from a transaction to the root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The transaction ID being proven
    pub txid: Digest,
    /// Position of the transaction in the leaf layer
    pub leaf_index: u64,
    /// Path from leaf to root - each element is a sibling hash
    pub path: Vec<Digest>,
}

/// A Bitcoin Merkle tree stored as layers, leaves first and root last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a Merkle tree from a list of transaction IDs
    pub fn build(txids: &[Digest]) -> Result<Self> {
        debug!("Building Merkle tree for {} transactions", txids.len());

        if txids.is_empty() {
            return Err(ProofError::InvalidArgument(
                "cannot build Merkle tree with no transactions".to_string(),
            ));
        }

        let mut layers = vec![txids.to_vec()];

        loop {
            let current = match layers.last() {
                Some(layer) if layer.len() > 1 => layer,
                _ => break,
            };

            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    // Bitcoin rule: if odd number of nodes, duplicate the last one
                    let right = pair.get(1).unwrap_or(left);
                    hash_pair(left, right)
                })
                .collect();

            layers.push(next);
        }

        let tree = MerkleTree { layers };
        debug!(
            "Merkle tree built successfully. Root: {}, depth: {}",
            hex::encode(tree.root()),
            tree.depth()
        );
        Ok(tree)
    }

    /// All layers, `layers()[0]` being the leaves.
    pub fn layers(&self) -> &[Vec<Digest>] {
        &self.layers
    }

    pub fn leaves(&self) -> &[Digest] {
        &self.layers[0]
    }

    pub fn root(&self) -> Digest {
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of hashing levels between the leaves and the root.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Sibling path for the first leaf equal to `target`.
    pub fn proof_for(&self, target: &Digest) -> Result<Vec<Digest>> {
        let index = self
            .leaves()
            .iter()
            .position(|leaf| leaf == target)
            .ok_or_else(|| {
                ProofError::NotFound(format!(
                    "{} is not a leaf of the tree",
                    hex::encode(target)
                ))
            })?;
        Ok(self.path_for_index(index))
    }

    /// Collects one sibling per non-root layer, walking from leaf `index` upwards.
    ///
    /// A left node sitting at the end of a non-root layer has no right
    /// neighbour, so it was hashed with itself and is its own sibling.
    pub fn path_for_index(&self, mut index: usize) -> Vec<Digest> {
        let last_layer = self.layers.len() - 1;
        let mut path = Vec::with_capacity(last_layer);

        for (depth, layer) in self.layers.iter().enumerate() {
            let is_right = index % 2 == 1;
            let sibling_index = if is_right {
                index - 1
            } else if index == layer.len() - 1 && depth < last_layer {
                index
            } else {
                index + 1
            };

            if let Some(sibling) = layer.get(sibling_index) {
                path.push(*sibling);
            }

            index /= 2;
        }

        path
    }

    /// Generate a Merkle proof for a transaction at the given index
    pub fn prove_index(&self, tx_index: u64) -> Result<MerkleProof> {
        let leaves = self.leaves();
        let index = usize::try_from(tx_index)
            .ok()
            .filter(|index| *index < leaves.len())
            .ok_or_else(|| {
                ProofError::InvalidArgument(format!(
                    "transaction index {} out of range (max: {})",
                    tx_index,
                    leaves.len() - 1
                ))
            })?;

        Ok(MerkleProof {
            txid: leaves[index],
            leaf_index: tx_index,
            path: self.path_for_index(index),
        })
    }
}

impl MerkleProof {
    /// Recombines the path against the leaf. Bit `i` of `leaf_index` tells
    /// whether the running hash is the right (1) or left (0) operand at level `i`.
    pub fn compute_root(&self) -> Digest {
        let mut current_hash = self.txid;
        let mut index = self.leaf_index;

        for sibling_hash in &self.path {
            current_hash = if index % 2 == 1 {
                hash_pair(sibling_hash, &current_hash)
            } else {
                hash_pair(&current_hash, sibling_hash)
            };
            index /= 2;
        }

        current_hash
    }

    /// Verify a Merkle proof against a given Merkle root
    pub fn verify(&self, merkle_root: &Digest) -> bool {
        let computed = self.compute_root();
        let is_valid = computed == *merkle_root;
        debug!(
            "Merkle proof verification: {} (computed: {}, expected: {})",
            if is_valid { "VALID" } else { "INVALID" },
            hex::encode(computed),
            hex::encode(merkle_root)
        );
        is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash256;

    fn leaves(n: u8) -> Vec<Digest> {
        (1..=n).map(|i| [i; 32]).collect()
    }

    #[test]
    fn test_merkle_tree_single_tx() {
        let tree = MerkleTree::build(&[[1u8; 32]]).unwrap();
        assert_eq!(tree.root(), [1u8; 32]);
        assert_eq!(tree.depth(), 0);
        assert!(tree.path_for_index(0).is_empty());
    }

    #[test]
    fn test_merkle_tree_empty_rejected() {
        assert!(matches!(
            MerkleTree::build(&[]),
            Err(ProofError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_merkle_tree_two_txs() {
        let txids = leaves(2);
        let tree = MerkleTree::build(&txids).unwrap();
        assert_eq!(tree.layers().len(), 2);
        assert_eq!(tree.root(), hash_pair(&txids[0], &txids[1]));

        assert_eq!(tree.proof_for(&txids[1]).unwrap(), vec![txids[0]]);
        assert_eq!(tree.proof_for(&txids[0]).unwrap(), vec![txids[1]]);
    }

    #[test]
    fn test_merkle_tree_odd_txs() {
        let txids = leaves(3);
        let tree = MerkleTree::build(&txids).unwrap();

        assert_eq!(tree.layers()[1][1], hash_pair(&txids[2], &txids[2]));
        assert_eq!(tree.path_for_index(2), vec![txids[2], tree.layers()[1][0]]);

        for i in 0..3 {
            let proof = tree.prove_index(i).unwrap();
            assert!(proof.verify(&tree.root()));
        }
    }

    #[test]
    fn test_layer_lengths_halve_rounding_up() {
        let tree = MerkleTree::build(&leaves(11)).unwrap();
        let lengths: Vec<usize> = tree.layers().iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![11, 6, 3, 2, 1]);
    }

    #[test]
    fn test_proof_for_missing_leaf() {
        let tree = MerkleTree::build(&leaves(4)).unwrap();
        assert!(matches!(
            tree.proof_for(&[0xaa; 32]),
            Err(ProofError::NotFound(_))
        ));
    }

    #[test]
    fn test_prove_index_out_of_range() {
        let tree = MerkleTree::build(&leaves(4)).unwrap();
        assert!(matches!(
            tree.prove_index(4),
            Err(ProofError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_tampered_proof_fails() {
        let tree = MerkleTree::build(&leaves(6)).unwrap();
        let mut proof = tree.prove_index(3).unwrap();
        proof.path[1] = hash256(b"tampered");
        assert!(!proof.verify(&tree.root()));

        let mut proof = tree.prove_index(3).unwrap();
        proof.leaf_index = 2;
        assert!(!proof.verify(&tree.root()));
    }
}
