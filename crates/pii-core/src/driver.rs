//! Log emission driver.
//!
//! Pulls rows from a [`RowSource`], renders each as a
//! `col1=val1;col2=val2;...;` message, and writes it through a
//! [`RedactingFormatter`] to a sink. Nothing here retries; the first error
//! from the source, the formatter or the sink ends the run.

use std::io::{self, BufRead, Write};

use pii_redact::{Level, LineFormatter, LogRecord, RedactingFormatter, RedactionError};
use thiserror::Error;

use crate::logging::USER_DATA_LOGGER;

/// One row: ordered `(column, value)` pairs.
pub type Row = Vec<(String, String)>;

/// Errors raised while emitting rows.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The data source produced something that is not a row.
    #[error("source error at line {line}: {reason}")]
    Source { line: usize, reason: String },

    /// Reading the source or writing the sink failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The formatter rejected the record.
    #[error(transparent)]
    Redaction(#[from] RedactionError),
}

/// A capability yielding rows of named columns.
pub trait RowSource {
    /// Next row, or `None` once the source is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>, DriverError>;
}

/// Rows from an in-memory iterator.
pub struct IterRowSource<I> {
    rows: I,
}

impl<I: Iterator<Item = Row>> IterRowSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(rows: T) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<I: Iterator<Item = Row>> RowSource for IterRowSource<I> {
    fn next_row(&mut self) -> Result<Option<Row>, DriverError> {
        Ok(self.rows.next())
    }
}

/// Rows from JSON Lines: one object per line, keys in document order.
///
/// Blank lines are skipped. Strings are used verbatim, `null` becomes an
/// empty value, other scalars use their JSON text.
pub struct JsonlRowSource<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> JsonlRowSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> RowSource for JsonlRowSource<R> {
    fn next_row(&mut self) -> Result<Option<Row>, DriverError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let value: serde_json::Value =
                serde_json::from_str(&line).map_err(|e| DriverError::Source {
                    line: self.line_no,
                    reason: e.to_string(),
                })?;
            let serde_json::Value::Object(map) = value else {
                return Err(DriverError::Source {
                    line: self.line_no,
                    reason: "expected a JSON object".to_string(),
                });
            };

            let row = map
                .into_iter()
                .map(|(column, value)| (column, render_value(value)))
                .collect();
            return Ok(Some(row));
        }
        Ok(None)
    }
}

fn render_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render a row as `col=val<sep>` segments, every segment terminated.
///
/// Values are not escaped. A value containing the separator splits into
/// two segments, and redaction only covers the part before the first
/// separator: `name=Smith; John` redacts to `name=***; John;`.
pub fn render_row(row: &[(String, String)], separator: &str) -> String {
    let mut message = String::new();
    for (column, value) in row {
        message.push_str(column);
        message.push('=');
        message.push_str(value);
        message.push_str(separator);
    }
    message
}

/// Emits rows as redacted log lines.
pub struct LogEmitter<W, F = pii_redact::TemplateFormatter> {
    formatter: RedactingFormatter<F>,
    sink: W,
    logger: String,
    level: Level,
}

impl<W: Write, F: LineFormatter> LogEmitter<W, F> {
    /// Emitter logging at INFO under the `user_data` logger name.
    pub fn new(formatter: RedactingFormatter<F>, sink: W) -> Self {
        Self {
            formatter,
            sink,
            logger: USER_DATA_LOGGER.to_string(),
            level: Level::Info,
        }
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Format and write one row. Nothing is written if formatting fails.
    pub fn emit(&mut self, row: &[(String, String)]) -> Result<(), DriverError> {
        let message = render_row(row, self.formatter.redactor().separator());
        let record = LogRecord::new(self.logger.as_str(), self.level, message);
        let line = self.formatter.format(&record)?;
        writeln!(self.sink, "{}", line)?;
        Ok(())
    }

    /// Drain `source`, returning the number of rows emitted.
    pub fn run<S: RowSource + ?Sized>(&mut self, source: &mut S) -> Result<usize, DriverError> {
        let mut emitted = 0;
        while let Some(row) = source.next_row()? {
            self.emit(&row)?;
            emitted += 1;
        }
        self.sink.flush()?;
        tracing::debug!(rows = emitted, logger = %self.logger, "row emission finished");
        Ok(emitted)
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_row() {
        let r = row(&[("name", "Bob"), ("ip", "::1")]);
        assert_eq!(render_row(&r, ";"), "name=Bob;ip=::1;");
        assert_eq!(render_row(&[], ";"), "");
    }

    #[test]
    fn test_separator_in_value_is_not_escaped() {
        let r = row(&[("name", "Smith; John"), ("ip", "::1")]);
        let message = render_row(&r, ";");
        assert_eq!(message, "name=Smith; John;ip=::1;");

        let mut emitter = LogEmitter::new(RedactingFormatter::pii(), Vec::new());
        emitter.emit(&r).unwrap();
        let out = String::from_utf8(emitter.into_sink()).unwrap();
        assert!(out.ends_with(": name=***; John;ip=::1;\n"));
    }

    #[test]
    fn test_jsonl_source_preserves_order() {
        let input = "{\"name\":\"Bob\",\"age\":42,\"ip\":null,\"ok\":true}\n\n{\"z\":\"1\",\"a\":\"2\"}\n";
        let mut source = JsonlRowSource::new(input.as_bytes());

        let first = source.next_row().unwrap().unwrap();
        assert_eq!(
            first,
            row(&[("name", "Bob"), ("age", "42"), ("ip", ""), ("ok", "true")])
        );
        let second = source.next_row().unwrap().unwrap();
        assert_eq!(second, row(&[("z", "1"), ("a", "2")]));
        assert!(source.next_row().unwrap().is_none());
    }

    #[test]
    fn test_jsonl_source_rejects_non_object() {
        let mut source = JsonlRowSource::new("{\"a\":\"1\"}\n[1,2]\n".as_bytes());
        source.next_row().unwrap();
        match source.next_row() {
            Err(DriverError::Source { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_jsonl_source_rejects_bad_json() {
        let mut source = JsonlRowSource::new("not json\n".as_bytes());
        assert!(matches!(
            source.next_row(),
            Err(DriverError::Source { line: 1, .. })
        ));
    }

    #[test]
    fn test_emit_redacts() {
        let mut emitter = LogEmitter::new(RedactingFormatter::pii(), Vec::new());
        emitter
            .emit(&row(&[("name", "Bob"), ("ip", "1.2.3.4")]))
            .unwrap();
        let out = String::from_utf8(emitter.into_sink()).unwrap();
        assert!(out.starts_with("[HOLBERTON] user_data INFO "));
        assert!(out.ends_with(": name=***;ip=1.2.3.4;\n"));
    }

    #[test]
    fn test_run_counts_rows() {
        let rows = vec![
            row(&[("email", "a@b.c")]),
            row(&[("phone", "555")]),
            row(&[("user_agent", "curl")]),
        ];
        let mut source = IterRowSource::new(rows);
        let mut emitter = LogEmitter::new(RedactingFormatter::pii(), Vec::new());

        assert_eq!(emitter.run(&mut source).unwrap(), 3);
        let out = String::from_utf8(emitter.into_sink()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("email=***;"));
        assert!(lines[1].ends_with("phone=***;"));
        assert!(lines[2].ends_with("user_agent=curl;"));
    }

    #[test]
    fn test_logger_and_level_overrides() {
        let mut emitter = LogEmitter::new(RedactingFormatter::pii(), Vec::new())
            .with_logger("audit")
            .with_level(Level::Warn);
        emitter.emit(&row(&[("ssn", "1")])).unwrap();
        let out = String::from_utf8(emitter.into_sink()).unwrap();
        assert!(out.starts_with("[HOLBERTON] audit WARN "));
    }

    #[test]
    fn test_empty_logger_fails_without_writing() {
        let mut emitter =
            LogEmitter::new(RedactingFormatter::pii(), Vec::new()).with_logger("");
        let err = emitter.emit(&row(&[("name", "Bob")])).unwrap_err();
        assert!(matches!(
            err,
            DriverError::Redaction(RedactionError::UpstreamFormat(_))
        ));
        assert!(emitter.into_sink().is_empty());
    }
}
