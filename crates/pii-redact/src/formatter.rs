//! Log line formatting with redaction applied after rendering.
//!
//! [`LineFormatter`] is the generic record-to-line step. [`RedactingFormatter`]
//! wraps any line formatter and runs the rendered line through a
//! [`FieldRedactor`]. It never writes to a sink.

use crate::error::{FormatError, Result};
use crate::record::LogRecord;
use crate::redactor::FieldRedactor;

/// Prefix used by [`TemplateFormatter::default`].
pub const DEFAULT_PREFIX: &str = "HOLBERTON";

/// chrono format for the timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Renders a record into a single line.
pub trait LineFormatter {
    fn format(&self, record: &LogRecord) -> std::result::Result<String, FormatError>;
}

impl<F: LineFormatter + ?Sized> LineFormatter for Box<F> {
    fn format(&self, record: &LogRecord) -> std::result::Result<String, FormatError> {
        (**self).format(record)
    }
}

/// Fixed template: `[PREFIX] <name> <level> <timestamp>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFormatter {
    prefix: String,
}

impl TemplateFormatter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl LineFormatter for TemplateFormatter {
    fn format(&self, record: &LogRecord) -> std::result::Result<String, FormatError> {
        if record.name.is_empty() {
            return Err(FormatError::MissingName);
        }
        Ok(format!(
            "[{}] {} {} {}: {}",
            self.prefix,
            record.name,
            record.level,
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.message
        ))
    }
}

/// Formatter that redacts configured PII fields from every rendered line.
#[derive(Debug, Clone)]
pub struct RedactingFormatter<F = TemplateFormatter> {
    inner: F,
    redactor: FieldRedactor,
}

impl RedactingFormatter<TemplateFormatter> {
    /// Template formatter with the default token (`***`) and separator (`;`).
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let redactor = FieldRedactor::new(
            fields,
            crate::DEFAULT_REDACTION,
            crate::DEFAULT_SEPARATOR,
        )?;
        Ok(Self::with_formatter(TemplateFormatter::default(), redactor))
    }

    /// Template formatter redacting [`PII_FIELDS`](crate::PII_FIELDS).
    pub fn pii() -> Self {
        Self::with_formatter(TemplateFormatter::default(), FieldRedactor::pii())
    }
}

impl<F: LineFormatter> RedactingFormatter<F> {
    pub fn with_formatter(inner: F, redactor: FieldRedactor) -> Self {
        tracing::debug!(
            fields = redactor.fields().len(),
            separator = redactor.separator(),
            "redacting formatter configured"
        );
        Self { inner, redactor }
    }

    /// Render `record` with the inner formatter, then redact the line.
    ///
    /// Inner failures come back as
    /// [`RedactionError::UpstreamFormat`](crate::RedactionError::UpstreamFormat).
    pub fn format(&self, record: &LogRecord) -> Result<String> {
        let line = self.inner.format(record)?;
        Ok(self.redactor.redact(&line))
    }

    pub fn redactor(&self) -> &FieldRedactor {
        &self.redactor
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}
