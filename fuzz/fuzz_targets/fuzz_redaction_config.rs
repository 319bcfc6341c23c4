//! Fuzz target for redaction config parsing.
//!
//! Tests that JSON config parsing and validation handle arbitrary input
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pii_redact::RedactionConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<RedactionConfig>(data) {
        if config.validate().is_ok() {
            assert!(config.redactor().is_ok());
        }
    }
});
