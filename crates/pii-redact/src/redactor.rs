//! Field redactor.
//!
//! Replaces the value of every `field=value<separator>` segment whose field
//! name is in the configured set. The scanner looks for the literal `field=`
//! prefix and consumes up to the next separator; it does not split the
//! message into tokens, so surrounding text and separator placement are
//! preserved byte for byte.
//!
//! A segment whose value is not followed by the separator is left alone.

use crate::error::{RedactionError, Result};

/// Default replacement literal.
pub const DEFAULT_REDACTION: &str = "***";

/// Default segment separator.
pub const DEFAULT_SEPARATOR: &str = ";";

/// Default set of PII field names.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Redact `fields` in `message`.
///
/// Fields are applied in the order given. Fails with
/// [`RedactionError::InvalidConfig`] if the separator or any field name is
/// empty.
///
/// ```
/// let out = pii_redact::redact(
///     &["password"],
///     "xxx",
///     "user=alice;password=secret;ip=1.2.3.4;",
///     ";",
/// )
/// .unwrap();
/// assert_eq!(out, "user=alice;password=xxx;ip=1.2.3.4;");
/// ```
pub fn redact<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: &str,
) -> Result<String> {
    validate(fields.iter().map(|f| f.as_ref()), separator)?;

    let mut output = message.to_string();
    for field in fields {
        output = redact_field(field.as_ref(), redaction, &output, separator);
    }
    Ok(output)
}

/// A validated, reusable redaction configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRedactor {
    fields: Vec<String>,
    redaction: String,
    separator: String,
}

impl FieldRedactor {
    /// Build a redactor, validating the separator and field names once.
    pub fn new<I, S>(
        fields: I,
        redaction: impl Into<String>,
        separator: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let separator = separator.into();
        validate(fields.iter().map(String::as_str), &separator)?;

        Ok(Self {
            fields,
            redaction: redaction.into(),
            separator,
        })
    }

    /// Redactor for [`PII_FIELDS`] with the default token and separator.
    pub fn pii() -> Self {
        Self {
            fields: PII_FIELDS.iter().map(|f| f.to_string()).collect(),
            redaction: DEFAULT_REDACTION.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Apply the configured redaction to `message`.
    pub fn redact(&self, message: &str) -> String {
        let mut output = message.to_string();
        for field in &self.fields {
            output = redact_field(field, &self.redaction, &output, &self.separator);
        }
        output
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn redaction(&self) -> &str {
        &self.redaction
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for FieldRedactor {
    fn default() -> Self {
        Self::pii()
    }
}

fn validate<'a>(mut fields: impl Iterator<Item = &'a str>, separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(RedactionError::invalid_config("separator must not be empty"));
    }
    if fields.any(str::is_empty) {
        return Err(RedactionError::invalid_config("field names must not be empty"));
    }
    Ok(())
}

/// Single-field pass. Matches are non-overlapping, left to right.
fn redact_field(field: &str, redaction: &str, message: &str, separator: &str) -> String {
    let prefix = format!("{field}=");
    let mut output = String::with_capacity(message.len());
    let mut rest = message;

    while let Some(start) = rest.find(&prefix) {
        let value_start = start + prefix.len();
        // No separator after this occurrence means none after any later one either.
        let Some(value_len) = rest[value_start..].find(separator) else {
            break;
        };

        output.push_str(&rest[..value_start]);
        output.push_str(redaction);
        output.push_str(separator);
        rest = &rest[value_start + value_len + separator.len()..];
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_listed_fields() {
        let out = redact(
            &["name", "email", "ssn"],
            "***",
            "name=John Smith;email=john@example.com;ssn=123-45-6789;",
            ";",
        )
        .unwrap();
        assert_eq!(out, "name=***;email=***;ssn=***;");
    }

    #[test]
    fn test_leaves_other_fields() {
        let out = redact(
            &["password"],
            "xxx",
            "user=alice;password=secret;ip=1.2.3.4;",
            ";",
        )
        .unwrap();
        assert_eq!(out, "user=alice;password=xxx;ip=1.2.3.4;");
    }

    #[test]
    fn test_empty_fields_is_noop() {
        let fields: [&str; 0] = [];
        let msg = "name=bob;email=bob@example.com;";
        assert_eq!(redact(&fields, "***", msg, ";").unwrap(), msg);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(redact(&["name"], "***", "", ";").unwrap(), "");
    }

    #[test]
    fn test_empty_separator_rejected() {
        let err = redact(&["name"], "***", "name=bob;", "").unwrap_err();
        assert!(matches!(err, RedactionError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let err = redact(&["name", ""], "***", "name=bob;", ";").unwrap_err();
        assert!(matches!(err, RedactionError::InvalidConfig(_)));
    }

    #[test]
    fn test_repeated_field_all_redacted() {
        let out = redact(&["email"], "***", "email=a@x;ip=1;email=b@y;", ";").unwrap();
        assert_eq!(out, "email=***;ip=1;email=***;");
    }

    #[test]
    fn test_absent_field_noop() {
        let msg = "user=alice;ip=1.2.3.4;";
        assert_eq!(redact(&["ssn"], "***", msg, ";").unwrap(), msg);
    }

    #[test]
    fn test_unterminated_final_segment_untouched() {
        let out = redact(&["name", "email"], "***", "name=bob;email=bob@x", ";").unwrap();
        assert_eq!(out, "name=***;email=bob@x");
    }

    #[test]
    fn test_empty_value_replaced() {
        let out = redact(&["name"], "***", "name=;ip=1;", ";").unwrap();
        assert_eq!(out, "name=***;ip=1;");
    }

    #[test]
    fn test_whitespace_and_punctuation_values() {
        let out = redact(&["phone", "name"], "***", "phone=   ;name=-.,!;", ";").unwrap();
        assert_eq!(out, "phone=***;name=***;");
    }

    #[test]
    fn test_value_equal_to_other_field_name_kept() {
        let out = redact(&["name", "email"], "***", "user=email;name=x;", ";").unwrap();
        assert_eq!(out, "user=email;name=***;");
    }

    #[test]
    fn test_multichar_separator() {
        let out = redact(&["ssn"], "[R]", "ssn=1-2-3 | ip=4 | ", " | ").unwrap();
        assert_eq!(out, "ssn=[R] | ip=4 | ");
    }

    #[test]
    fn test_surrounding_text_preserved() {
        let line = "[HOLBERTON] user_data INFO 2019-11-19 18:24:25,105: name=Bob; ip=::1;";
        let out = redact(&["name"], "***", line, ";").unwrap();
        assert_eq!(
            out,
            "[HOLBERTON] user_data INFO 2019-11-19 18:24:25,105: name=***; ip=::1;"
        );
    }

    #[test]
    fn test_token_containing_separator_is_not_escaped() {
        let out = redact(&["name"], "a;b", "name=bob;", ";").unwrap();
        assert_eq!(out, "name=a;b;");
    }

    #[test]
    fn test_idempotent_on_redacted_message() {
        let once = redact(&PII_FIELDS, "***", "name=x;email=y;phone=z;ip=1;", ";").unwrap();
        let twice = redact(&PII_FIELDS, "***", &once, ";").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_field_redactor_matches_free_function() {
        let redactor = FieldRedactor::new(["name", "ssn"], "***", ";").unwrap();
        let msg = "name=bob;ssn=1;ip=2;";
        assert_eq!(
            redactor.redact(msg),
            redact(&["name", "ssn"], "***", msg, ";").unwrap()
        );
    }

    #[test]
    fn test_field_redactor_validates() {
        assert!(FieldRedactor::new(["name"], "***", "").is_err());
        assert!(FieldRedactor::new([""], "***", ";").is_err());
    }

    #[test]
    fn test_pii_defaults() {
        let redactor = FieldRedactor::default();
        assert_eq!(redactor.fields().len(), 5);
        assert_eq!(redactor.redaction(), "***");
        assert_eq!(redactor.separator(), ";");
        assert_eq!(
            redactor.redact("name=a;email=b;phone=c;ssn=d;password=e;ip=f;"),
            "name=***;email=***;phone=***;ssn=***;password=***;ip=f;"
        );
    }
}
