//! Credential hasher.
//!
//! bcrypt with a per-call random salt. Verification re-derives the digest
//! from the salt and cost embedded in the stored hash and compares in
//! constant time.

use crate::error::{CredentialError, Result};
use crate::hash::{CredentialHash, DIGEST_LEN};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use subtle::ConstantTimeEq;

/// Lowest accepted work factor.
pub const MIN_COST: u32 = 4;
/// Highest accepted work factor.
pub const MAX_COST: u32 = 31;
/// Work factor used by [`CredentialHasher::default`].
pub const DEFAULT_COST: u32 = 12;

/// Longest plaintext bcrypt hashes without truncation.
pub const MAX_PLAINTEXT_BYTES: usize = 72;

const SALT_BYTES: usize = 16;

/// bcrypt's base64 variant: custom alphabet, no padding, 22 chars for 16 bytes.
const BCRYPT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Hashes and verifies plaintext credentials at a fixed cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    /// Create a hasher; `cost` must be within [`MIN_COST`]..=[`MAX_COST`].
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(CredentialError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `plaintext` with a fresh random salt.
    ///
    /// bcrypt only reads the first [`MAX_PLAINTEXT_BYTES`] bytes of its
    /// input, so longer plaintexts fail with
    /// [`CredentialError::PlaintextTooLong`] instead of being truncated.
    /// Otherwise fails only when no randomness is available or encoding
    /// breaks.
    pub fn hash(&self, plaintext: &str) -> Result<CredentialHash> {
        if plaintext.len() > MAX_PLAINTEXT_BYTES {
            return Err(CredentialError::PlaintextTooLong(plaintext.len()));
        }

        let mut salt = [0u8; SALT_BYTES];
        getrandom::getrandom(&mut salt).map_err(|e| {
            CredentialError::Encoding(format!("failed to generate random salt: {}", e))
        })?;

        let parts = bcrypt::hash_with_salt(plaintext, self.cost, salt)
            .map_err(|e| CredentialError::Encoding(format!("bcrypt hash failed: {}", e)))?;
        let hash: CredentialHash = parts.format_for_version(bcrypt::Version::TwoB).parse()?;

        tracing::trace!(cost = self.cost, "credential hashed");
        Ok(hash)
    }

    /// Check `plaintext` against a stored hash.
    ///
    /// Uses the stored cost, not this hasher's. A mismatch is `false`.
    pub fn verify(&self, hash: &CredentialHash, plaintext: &str) -> bool {
        verify(hash, plaintext)
    }

    /// True when `hash` was produced with a lower cost than this hasher's.
    pub fn needs_rehash(&self, hash: &CredentialHash) -> bool {
        hash.cost() < self.cost
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

/// Re-derive the digest for `plaintext` and compare it with the stored one.
///
/// A plaintext over [`MAX_PLAINTEXT_BYTES`] never matches, even against a
/// hash of its own prefix.
pub fn verify(hash: &CredentialHash, plaintext: &str) -> bool {
    if plaintext.len() > MAX_PLAINTEXT_BYTES {
        return false;
    }
    let Some(salt) = decode_salt(hash.salt()) else {
        return false;
    };
    // Cost was range-checked when the hash was parsed, so this only fails
    // for inputs bcrypt itself rejects; those never match.
    let Ok(parts) = bcrypt::hash_with_salt(plaintext, hash.cost(), salt) else {
        return false;
    };
    let derived = parts.format_for_version(bcrypt::Version::TwoB);
    let derived_digest = &derived.as_bytes()[derived.len() - DIGEST_LEN..];

    derived_digest.ct_eq(hash.digest().as_bytes()).into()
}

fn decode_salt(encoded: &str) -> Option<[u8; SALT_BYTES]> {
    let bytes = BCRYPT_B64.decode(encoded).ok()?;
    bytes.try_into().ok()
}

/// Hash with the default cost.
pub fn hash_password(plaintext: &str) -> Result<CredentialHash> {
    CredentialHasher::default().hash(plaintext)
}

/// Parse `stored` and verify `plaintext` against it.
///
/// A stored value that does not parse never matches.
pub fn is_valid(stored: &str, plaintext: &str) -> bool {
    stored
        .parse::<CredentialHash>()
        .map(|hash| verify(&hash, plaintext))
        .unwrap_or(false)
}
