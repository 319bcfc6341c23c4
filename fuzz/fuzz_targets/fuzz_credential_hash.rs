//! Fuzz target for stored credential hash parsing.
//!
//! Parsing arbitrary bytes must never panic; anything that parses must
//! print back unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pii_credential::CredentialHash;

fuzz_target!(|data: &[u8]| {
    if let Ok(hash) = CredentialHash::try_from(data) {
        assert_eq!(hash.as_bytes(), data);
    }
});
