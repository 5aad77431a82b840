//! Synthetic block transaction identifiers.
//!
//! All identifiers are in internal byte order (the raw double-SHA-256
//! output), which is the reverse of what block explorers display.

use rand::RngCore;

use crate::error::{ProofError, Result};
use crate::hash::{digest_from_slice, hash256, Digest};

/// Placeholder for the coinbase slot of a witness tree (BIP-141 uses zero).
pub const COINBASE_WITNESS_PLACEHOLDER: Digest = [0u8; 32];

/// How filler identifiers are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMode {
    /// `hash256` of 32 fresh random bytes per identifier
    Random,
    /// `hash256` of the big-endian 8-byte slot index
    Deterministic,
}

impl IdMode {
    pub fn from_randomize(randomize: bool) -> Self {
        if randomize {
            IdMode::Random
        } else {
            IdMode::Deterministic
        }
    }
}

/// Generates `count` block-level identifiers.
pub fn synthesize_ids(count: u64, mode: IdMode) -> Result<Vec<Digest>> {
    if count == 0 {
        return Err(ProofError::InvalidArgument(
            "transaction count must be at least 1".to_string(),
        ));
    }
    let len = usize::try_from(count).map_err(|_| too_many(count))?;

    let mut ids: Vec<Digest> = Vec::new();
    ids.try_reserve_exact(len).map_err(|_| too_many(count))?;

    match mode {
        IdMode::Random => {
            let mut rng = rand::thread_rng();
            ids.extend((0..len).map(|_| {
                let mut seed = [0u8; 32];
                rng.fill_bytes(&mut seed);
                hash256(&seed)
            }));
        }
        IdMode::Deterministic => ids.extend((0..count).map(|i| hash256(&i.to_be_bytes()))),
    }

    Ok(ids)
}

fn too_many(count: u64) -> ProofError {
    ProofError::InvalidArgument(format!("transaction count {} does not fit in memory", count))
}

/// Places `tx_digest` at `position` and the zero placeholder at slot 0,
/// producing the leaf list of a witness commitment tree.
///
/// When `position` is 0 the transaction digest wins.
pub fn with_witness_override(ids: Vec<Digest>, tx_digest: &[u8], position: u64) -> Result<Vec<Digest>> {
    let (mut ids, slot, digest) = checked_slot(ids, tx_digest, position)?;
    ids[0] = COINBASE_WITNESS_PLACEHOLDER;
    ids[slot] = digest;
    Ok(ids)
}

/// Places `tx_digest` at `position`, leaving every other slot untouched.
pub fn with_plain_override(ids: Vec<Digest>, tx_digest: &[u8], position: u64) -> Result<Vec<Digest>> {
    let (mut ids, slot, digest) = checked_slot(ids, tx_digest, position)?;
    ids[slot] = digest;
    Ok(ids)
}

fn checked_slot(ids: Vec<Digest>, tx_digest: &[u8], position: u64) -> Result<(Vec<Digest>, usize, Digest)> {
    let digest = digest_from_slice(tx_digest)?;
    let slot = usize::try_from(position)
        .ok()
        .filter(|slot| *slot < ids.len())
        .ok_or_else(|| {
            ProofError::InvalidArgument(format!(
                "list of {} ids is not long enough for position {}",
                ids.len(),
                position
            ))
        })?;
    Ok((ids, slot, digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_ids_are_hashed_indices() {
        let ids = synthesize_ids(3, IdMode::Deterministic).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(
            hex::encode(ids[0]),
            "7ef0ca626bbb058dd443bb78e33b888bdec8295c96e51f5545f96370870c10b9"
        );
        assert_eq!(ids[2], hash256(&2u64.to_be_bytes()));
        assert_eq!(ids, synthesize_ids(3, IdMode::Deterministic).unwrap());
    }

    #[test]
    fn test_random_ids_differ_between_calls() {
        let first = synthesize_ids(4, IdMode::Random).unwrap();
        let second = synthesize_ids(4, IdMode::Random).unwrap();
        assert_eq!(first.len(), 4);
        assert_ne!(first, second);
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(matches!(
            synthesize_ids(0, IdMode::Deterministic),
            Err(ProofError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unallocatable_count_rejected() {
        for mode in [IdMode::Random, IdMode::Deterministic] {
            assert!(matches!(
                synthesize_ids(u64::MAX, mode),
                Err(ProofError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_witness_override_sets_placeholder_and_position() {
        let ids = synthesize_ids(4, IdMode::Deterministic).unwrap();
        let original = ids.clone();
        let ids = with_witness_override(ids, &[7u8; 32], 2).unwrap();
        assert_eq!(ids[0], COINBASE_WITNESS_PLACEHOLDER);
        assert_eq!(ids[1], original[1]);
        assert_eq!(ids[2], [7u8; 32]);
        assert_eq!(ids[3], original[3]);
    }

    #[test]
    fn test_witness_override_position_zero_keeps_tx() {
        let ids = synthesize_ids(2, IdMode::Deterministic).unwrap();
        let ids = with_witness_override(ids, &[7u8; 32], 0).unwrap();
        assert_eq!(ids[0], [7u8; 32]);
    }

    #[test]
    fn test_plain_override_only_touches_position() {
        let ids = synthesize_ids(3, IdMode::Deterministic).unwrap();
        let original = ids.clone();
        let ids = with_plain_override(ids, &[9u8; 32], 0).unwrap();
        assert_eq!(ids[0], [9u8; 32]);
        assert_eq!(&ids[1..], &original[1..]);
    }

    #[test]
    fn test_override_rejects_bad_position_and_digest() {
        let ids = synthesize_ids(2, IdMode::Deterministic).unwrap();
        assert!(matches!(
            with_plain_override(ids.clone(), &[1u8; 32], 2),
            Err(ProofError::InvalidArgument(_))
        ));
        assert!(matches!(
            with_witness_override(ids.clone(), &[1u8; 31], 1),
            Err(ProofError::InvalidArgument(_))
        ));
        assert!(with_witness_override(ids, &[1u8; 32], u64::MAX).is_err());
    }
}
