//! Fuzz target for the field redactor.
//!
//! Arbitrary messages must never panic the scanner. With letter-only field
//! names and a `;` separator, redaction must also preserve the separator
//! count and be idempotent.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    fields: Vec<&'a str>,
    message: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let fields: Vec<&str> = input
        .fields
        .into_iter()
        .filter(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_lowercase()))
        .collect();

    let once = pii_redact::redact(&fields, "***", input.message, ";").unwrap();
    assert_eq!(once.matches(';').count(), input.message.matches(';').count());

    let twice = pii_redact::redact(&fields, "***", &once, ";").unwrap();
    assert_eq!(once, twice);
});
