//! Salted one-way credential hashing.
//!
//! Plaintext credentials are hashed with bcrypt using a fresh random salt on
//! every call, so the same password never produces the same stored value.
//! Verification re-derives the digest from the salt and cost embedded in the
//! stored hash and compares in constant time. There is no way back from a
//! hash to its plaintext. Plaintexts longer than bcrypt's 72-byte input
//! block are rejected rather than silently truncated.
//!
//! # Example
//!
//! ```
//! use pii_credential::CredentialHasher;
//!
//! let hasher = CredentialHasher::new(4).unwrap();
//! let stored = hasher.hash("MyAmazingPassw0rd").unwrap();
//!
//! assert!(hasher.verify(&stored, "MyAmazingPassw0rd"));
//! assert!(!hasher.verify(&stored, "wrong"));
//! ```

pub mod error;
pub mod hash;
pub mod hasher;

pub use error::{CredentialError, Result};
pub use hash::{CredentialHash, Version};
pub use hasher::{
    hash_password, is_valid, verify, CredentialHasher, DEFAULT_COST, MAX_COST,
    MAX_PLAINTEXT_BYTES, MIN_COST,
};
