//! Error types for field redaction and log line formatting.

use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors that can occur while configuring or applying redaction.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// Empty separator, empty field name, or an otherwise unusable setting.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The wrapped line formatter rejected the record.
    #[error("upstream format error: {0}")]
    UpstreamFormat(#[from] FormatError),

    /// I/O error while reading or writing a config file.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RedactionError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        RedactionError::InvalidConfig(msg.into())
    }
}

/// Failure reported by a [`LineFormatter`](crate::LineFormatter).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The record carries no logger name.
    #[error("record has no logger name")]
    MissingName,

    /// Any other malformed record.
    #[error("malformed record: {0}")]
    Malformed(String),
}
