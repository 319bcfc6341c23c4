//! Structured logging foundation for pii-core.
//!
//! Provides two output modes on stderr:
//! - Human-readable console output for interactive use
//! - Redacted `[PREFIX] <name> <level> <timestamp>: <message>` lines where
//!   configured PII fields are replaced before anything is written
//!
//! # Usage
//!
//! ```ignore
//! use pii_core::logging::{init_logging, LogConfig};
//! use pii_redact::RedactingFormatter;
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config, RedactingFormatter::pii());
//!
//! tracing::info!(target: "user_data", "name=Bob;ip=10.0.0.1;");
//! ```
//!
//! # Design Notes
//!
//! - stdout is reserved for command payloads
//! - stderr receives all log output
//! - Loggers are built by explicit factories; the caller owns their lifecycle

pub mod config;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use layer::RedactingLayer;

use pii_redact::RedactingFormatter;
use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Logger name used for user-data rows.
pub const USER_DATA_LOGGER: &str = "user_data";

/// Stderr layer redacting the default PII field set.
pub fn user_data_layer() -> RedactingLayer {
    RedactingLayer::stderr(RedactingFormatter::pii())
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. The filter
/// comes from [`LogConfig::directives`]; invalid `RUST_LOG` directives fall
/// back to `info`.
pub fn init_logging(config: &LogConfig, formatter: RedactingFormatter) {
    let filter = env_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_ansi(use_ansi),
                )
                .init();
        }
        LogFormat::Redacted => {
            tracing_subscriber::registry()
                .with(filter)
                .with(RedactingLayer::stderr(formatter))
                .init();
        }
    }
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_new(config.directives())
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::default().directive()))
}
