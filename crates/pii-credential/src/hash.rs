//! Encoded credential hashes.
//!
//! Hashes use the Modular Crypt Format produced by bcrypt:
//!
//! ```text
//! $2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW
//! \__/\_/\____________________/\_____________________________/
//!  |   |        salt (22)                 digest (31)
//!  |   cost
//!  version
//! ```
//!
//! The encoding is stable: a hash stored by one run verifies in any later run.

use crate::error::{CredentialError, Result};
use std::fmt;
use std::str::FromStr;

pub(crate) const SALT_LEN: usize = 22;
pub(crate) const DIGEST_LEN: usize = 31;

/// bcrypt revision marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    TwoA,
    TwoB,
    TwoX,
    TwoY,
}

impl Version {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "2a" => Some(Version::TwoA),
            "2b" => Some(Version::TwoB),
            "2x" => Some(Version::TwoX),
            "2y" => Some(Version::TwoY),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Version::TwoA => "2a",
            Version::TwoB => "2b",
            Version::TwoX => "2x",
            Version::TwoY => "2y",
        };
        write!(f, "{}", s)
    }
}

/// A parsed, validated credential hash.
///
/// Opaque apart from its version and cost; the plaintext cannot be
/// recovered from it.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash {
    encoded: String,
    version: Version,
    cost: u32,
}

impl CredentialHash {
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// The full textual encoding, suitable for storage.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Stored bytes, for callers persisting raw byte columns.
    pub fn as_bytes(&self) -> &[u8] {
        self.encoded.as_bytes()
    }

    pub(crate) fn salt(&self) -> &str {
        let start = self.encoded.len() - SALT_LEN - DIGEST_LEN;
        &self.encoded[start..start + SALT_LEN]
    }

    pub(crate) fn digest(&self) -> &str {
        &self.encoded[self.encoded.len() - DIGEST_LEN..]
    }
}

impl FromStr for CredentialHash {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = |why: &str| CredentialError::MalformedHash(why.to_string());

        let mut parts = s.splitn(4, '$');
        if parts.next() != Some("") {
            return Err(malformed("missing leading '$'"));
        }
        let version = parts
            .next()
            .and_then(Version::parse)
            .ok_or_else(|| malformed("unknown version"))?;
        let cost_str = parts.next().ok_or_else(|| malformed("missing cost"))?;
        if cost_str.len() != 2 || !cost_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("cost must be two digits"));
        }
        let cost: u32 = cost_str.parse().map_err(|_| malformed("cost is not a number"))?;
        if !(crate::MIN_COST..=crate::MAX_COST).contains(&cost) {
            return Err(CredentialError::InvalidCost(cost));
        }
        let body = parts.next().ok_or_else(|| malformed("missing salt and digest"))?;
        if body.len() != SALT_LEN + DIGEST_LEN {
            return Err(malformed("salt and digest must be 53 characters"));
        }
        if !body.bytes().all(is_bcrypt_b64) {
            return Err(malformed("invalid character in salt or digest"));
        }

        Ok(Self {
            encoded: s.to_string(),
            version,
            cost,
        })
    }
}

impl TryFrom<&[u8]> for CredentialHash {
    type Error = CredentialError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .map_err(|_| CredentialError::MalformedHash("not valid UTF-8".to_string()))?
            .parse()
    }
}

impl fmt::Display for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

// Keep the digest out of debug output.
impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHash")
            .field("version", &self.version)
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

fn is_bcrypt_b64(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'/'
}
