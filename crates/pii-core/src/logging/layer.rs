//! Tracing layer that writes PII-redacted log lines.
//!
//! Each event becomes a [`LogRecord`]: the event target is the logger name,
//! the `message` field is the message, and any other fields are appended as
//! `key=value;` segments so that configured PII fields are redacted along
//! with the rest of the line.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;

use pii_redact::{Level, LogRecord, RedactingFormatter};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Collects the message and remaining fields of an event.
struct RecordVisitor {
    message: Option<String>,
    fields: String,
    separator: String,
}

impl RecordVisitor {
    fn new(separator: &str) -> Self {
        RecordVisitor {
            message: None,
            fields: String::new(),
            separator: separator.to_string(),
        }
    }

    fn push(&mut self, name: &str, value: &dyn std::fmt::Display) {
        let _ = write!(self.fields, "{}={}{}", name, value, self.separator);
    }

    fn into_message(self) -> String {
        match self.message {
            Some(msg) if self.fields.is_empty() => msg,
            Some(msg) => format!("{} {}", msg, self.fields),
            None => self.fields,
        }
    }
}

impl tracing::field::Visit for RecordVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field.name(), &value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(s);
        } else {
            self.push(field.name(), &s);
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push(field.name(), &value);
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push(field.name(), &value);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.push(field.name(), &value);
    }
}

/// Tracing layer writing redacted lines to `W` (stderr by default).
pub struct RedactingLayer<W = io::Stderr> {
    writer: Mutex<W>,
    formatter: RedactingFormatter,
}

impl RedactingLayer<io::Stderr> {
    /// Create a layer writing to stderr.
    pub fn stderr(formatter: RedactingFormatter) -> Self {
        RedactingLayer::new(io::stderr(), formatter)
    }
}

impl<W: Write> RedactingLayer<W> {
    /// Create a layer with a custom writer.
    pub fn new(writer: W, formatter: RedactingFormatter) -> Self {
        RedactingLayer {
            writer: Mutex::new(writer),
            formatter,
        }
    }

    pub fn formatter(&self) -> &RedactingFormatter {
        &self.formatter
    }
}

impl<S, W> Layer<S> for RedactingLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + Send + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::new(self.formatter.redactor().separator());
        event.record(&mut visitor);

        let metadata = event.metadata();
        let record = LogRecord::new(
            metadata.target(),
            Level::from(*metadata.level()),
            visitor.into_message(),
        );

        // A record the formatter rejects is dropped rather than written unredacted.
        let Ok(line) = self.formatter.format(&record) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(formatter: RedactingFormatter, f: F) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = RedactingLayer::new(BufWriter(buffer.clone()), formatter);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        let output = buffer.lock().unwrap();
        String::from_utf8_lossy(&output).into_owned()
    }

    #[test]
    fn test_message_redacted() {
        let out = capture(RedactingFormatter::pii(), || {
            tracing::info!(target: "user_data", "name=Bob;email=bob@x.com;ip=::1;");
        });
        assert!(out.starts_with("[HOLBERTON] user_data INFO "));
        assert!(out.trim_end().ends_with(": name=***;email=***;ip=::1;"));
        assert!(!out.contains("bob@x.com"));
    }

    #[test]
    fn test_fields_become_segments() {
        let out = capture(RedactingFormatter::pii(), || {
            tracing::warn!(target: "auth", email = "a@b.c", attempts = 3, "login failed");
        });
        assert!(out.contains(" auth WARN "));
        assert!(out.contains(": login failed email=***;attempts=3;"));
    }

    #[test]
    fn test_fields_without_message() {
        let out = capture(RedactingFormatter::pii(), || {
            tracing::error!(target: "db", ssn = %"123-45-6789", ok = false);
        });
        assert!(out.trim_end().ends_with(": ssn=***;ok=false;"));
    }

    #[test]
    fn test_custom_field_set() {
        let formatter = RedactingFormatter::new(["ip"]).unwrap();
        let out = capture(formatter, || {
            tracing::info!(target: "net", "name=Bob;ip=10.0.0.1;");
        });
        assert!(out.contains(": name=Bob;ip=***;"));
    }

    #[test]
    fn test_one_line_per_event() {
        let out = capture(RedactingFormatter::pii(), || {
            tracing::info!(target: "a", "one");
            tracing::info!(target: "b", "two");
        });
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_visitor_joins_message_and_fields() {
        let mut v = RecordVisitor::new(";");
        v.message = Some("hello".to_string());
        v.push("k", &"v");
        assert_eq!(v.into_message(), "hello k=v;");
        assert_eq!(RecordVisitor::new(";").into_message(), "");
    }
}
