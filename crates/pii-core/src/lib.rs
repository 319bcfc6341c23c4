//! PII-safe log emission and credential tooling.
//!
//! Glue around [`pii_redact`] and [`pii_credential`]:
//! - [`driver`]: render data-source rows as `field=value;` messages and emit
//!   them as redacted log lines
//! - [`logging`]: tracing setup, including a layer that redacts every event
//! - [`exit_codes`]: stable CLI exit codes

pub mod driver;
pub mod exit_codes;
pub mod logging;

pub use driver::{
    render_row, DriverError, IterRowSource, JsonlRowSource, LogEmitter, Row, RowSource,
};
pub use exit_codes::ExitCode;
