/// Error types for proof generation.
///
/// Every variant is a deterministic precondition failure: the same inputs
/// always produce the same error and no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProofError {
    /// A caller-supplied argument violates a precondition
    /// (index out of range, digest of the wrong length, empty leaf list).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The digest asked to be proven is not a leaf of the tree.
    #[error("not found: {0}")]
    NotFound(String),

    /// A proof bundle does not recombine to the roots it claims.
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// CBOR encoding or decoding of a proof bundle failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ProofError>;
