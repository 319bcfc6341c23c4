//! Field-level PII redaction for structured log lines.
//!
//! Log messages in this system are rendered as `field=value;` segments. This
//! crate replaces the values of caller-named fields (by default `name`,
//! `email`, `phone`, `ssn`, `password`) with a fixed token before the line
//! reaches any sink.
//!
//! # Key Features
//!
//! - **Name-anchored matching**: only fields explicitly listed are touched;
//!   nothing is inferred from content.
//! - **Structure preserving**: separators, unlisted fields, and surrounding
//!   text come out byte for byte.
//! - **Idempotent**: redacting an already redacted line is a no-op.
//! - **Composable formatting**: [`RedactingFormatter`] wraps any
//!   [`LineFormatter`] and redacts after rendering.
//!
//! # Example
//!
//! ```
//! use pii_redact::{Level, LogRecord, RedactingFormatter};
//!
//! let formatter = RedactingFormatter::pii();
//! let record = LogRecord::new("user_data", Level::Info, "name=Bob;ip=10.0.0.1;");
//! let line = formatter.format(&record).unwrap();
//! assert!(line.ends_with(": name=***;ip=10.0.0.1;"));
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod record;
pub mod redactor;

pub use config::{RedactionConfig, DEFAULT_HASH_COST};
pub use error::{FormatError, RedactionError, Result};
pub use formatter::{LineFormatter, RedactingFormatter, TemplateFormatter, DEFAULT_PREFIX};
pub use record::{Level, LogRecord};
pub use redactor::{redact, FieldRedactor, DEFAULT_REDACTION, DEFAULT_SEPARATOR, PII_FIELDS};
