use sha2::{Digest as _, Sha256};

/// A 32-byte double SHA-256 output, kept in internal (non-reversed) byte order.
pub type Digest = [u8; 32];

/// Applies double SHA-256 to data
pub fn hash256(data: &[u8]) -> Digest {
    let first_hash = Sha256::digest(data);
    Sha256::digest(first_hash).into()
}

/// Hashes two child nodes into their parent: `hash256(left || right)`.
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut combined = [0u8; 64];
    combined[..32].copy_from_slice(left);
    combined[32..].copy_from_slice(right);
    hash256(&combined)
}

/// Converts a byte slice into a digest, rejecting anything that is not 32 bytes.
pub fn digest_from_slice(bytes: &[u8]) -> crate::Result<Digest> {
    bytes.try_into().map_err(|_| {
        crate::ProofError::InvalidArgument(format!(
            "digest must be 32 bytes, got {}",
            bytes.len()
        ))
    })
}

/// Renders a digest the way block explorers show it (byte-reversed).
pub fn to_display_hex(digest: &Digest) -> String {
    let mut reversed = *digest;
    reversed.reverse();
    hex::encode(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::hashes::{sha256d, Hash};

    #[test]
    fn test_hash256_matches_sha256d() {
        for data in [&b""[..], b"abc", &[0u8; 80][..], &[0xffu8; 1000][..]] {
            assert_eq!(hash256(data), sha256d::Hash::hash(data).to_byte_array());
        }
    }

    #[test]
    fn test_hash256_empty_input() {
        assert_eq!(
            hex::encode(hash256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_hash_pair_is_concatenation() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        let mut combined = left.to_vec();
        combined.extend_from_slice(&right);
        assert_eq!(hash_pair(&left, &right), hash256(&combined));
        assert_ne!(hash_pair(&left, &right), hash_pair(&right, &left));
    }

    #[test]
    fn test_digest_from_slice_rejects_wrong_length() {
        assert!(digest_from_slice(&[0u8; 32]).is_ok());
        assert!(matches!(
            digest_from_slice(&[0u8; 31]),
            Err(crate::ProofError::InvalidArgument(_))
        ));
        assert!(digest_from_slice(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_display_hex_is_reversed() {
        let mut digest = [0u8; 32];
        digest[0] = 0xab;
        let shown = to_display_hex(&digest);
        assert!(shown.ends_with("ab"));
        assert!(shown.starts_with("00"));
    }
}
