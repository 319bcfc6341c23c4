//! Error types for credential hashing.

use thiserror::Error;

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Errors that can occur while hashing or parsing credentials.
///
/// A password that does not match is not an error; see
/// [`CredentialHasher::verify`](crate::CredentialHasher::verify).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// No randomness available, or the hash could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Work factor outside the supported range.
    #[error("cost {0} out of range ({min}..={max})", min = crate::MIN_COST, max = crate::MAX_COST)]
    InvalidCost(u32),

    /// Plaintext longer than bcrypt's input block.
    #[error("plaintext is {0} bytes; at most {max} are accepted", max = crate::MAX_PLAINTEXT_BYTES)]
    PlaintextTooLong(usize),

    /// Stored hash is not a valid encoding.
    #[error("malformed hash: {0}")]
    MalformedHash(String),
}
