//! Redaction configuration.
//!
//! Recognized options: which field names are redacted, the replacement
//! literal, the segment separator, and the credential hash cost. Values are
//! read once (file, then environment) and are immutable afterwards.

use crate::error::{RedactionError, Result};
use crate::formatter::{RedactingFormatter, TemplateFormatter};
use crate::redactor::{FieldRedactor, DEFAULT_REDACTION, DEFAULT_SEPARATOR, PII_FIELDS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bcrypt cost for credential hashing.
pub const DEFAULT_HASH_COST: u32 = 12;

/// Environment variable overriding [`RedactionConfig::pii_fields`] (comma separated).
pub const ENV_FIELDS: &str = "PII_FIELDS";
/// Environment variable overriding [`RedactionConfig::redaction`].
pub const ENV_REDACTION: &str = "PII_REDACTION";
/// Environment variable overriding [`RedactionConfig::separator`].
pub const ENV_SEPARATOR: &str = "PII_SEPARATOR";
/// Environment variable overriding [`RedactionConfig::hash_cost`].
pub const ENV_HASH_COST: &str = "PII_HASH_COST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Field names whose values are replaced.
    #[serde(default = "default_fields")]
    pub pii_fields: Vec<String>,

    /// Replacement literal.
    #[serde(default = "default_redaction")]
    pub redaction: String,

    /// Segment separator. Must not be empty.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Work factor for credential hashing.
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
}

fn default_fields() -> Vec<String> {
    PII_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn default_redaction() -> String {
    DEFAULT_REDACTION.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_hash_cost() -> u32 {
    DEFAULT_HASH_COST
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            pii_fields: default_fields(),
            redaction: default_redaction(),
            separator: default_separator(),
            hash_cost: default_hash_cost(),
        }
    }
}

impl RedactionConfig {
    /// Load config from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RedactionConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `PII_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (used by [`apply_env`](Self::apply_env)).
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_FIELDS) {
            self.pii_fields = val
                .split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect();
        }
        if let Some(val) = lookup(ENV_REDACTION) {
            self.redaction = val;
        }
        if let Some(val) = lookup(ENV_SEPARATOR) {
            self.separator = val;
        }
        if let Some(val) = lookup(ENV_HASH_COST) {
            self.hash_cost = val.trim().parse().map_err(|_| {
                RedactionError::invalid_config(format!("{ENV_HASH_COST} is not a number: {val}"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject empty separators and empty field names.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(RedactionError::invalid_config("separator must not be empty"));
        }
        if let Some(pos) = self.pii_fields.iter().position(String::is_empty) {
            return Err(RedactionError::invalid_config(format!(
                "pii_fields[{pos}] is empty"
            )));
        }
        Ok(())
    }

    pub fn redactor(&self) -> Result<FieldRedactor> {
        FieldRedactor::new(
            self.pii_fields.iter().cloned(),
            self.redaction.clone(),
            self.separator.clone(),
        )
    }

    /// Redacting formatter over the default line template.
    pub fn formatter(&self) -> Result<RedactingFormatter> {
        Ok(RedactingFormatter::with_formatter(
            TemplateFormatter::default(),
            self.redactor()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RedactionConfig::default();
        assert_eq!(config.pii_fields, ["name", "email", "phone", "ssn", "password"]);
        assert_eq!(config.redaction, "***");
        assert_eq!(config.separator, ";");
        assert_eq!(config.hash_cost, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RedactionConfig = serde_json::from_str(r#"{"redaction":"xxx"}"#).unwrap();
        assert_eq!(config.redaction, "xxx");
        assert_eq!(config.separator, ";");
        assert_eq!(config.pii_fields.len(), 5);
    }

    #[test]
    fn test_validate_empty_separator() {
        let config = RedactionConfig {
            separator: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RedactionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_empty_field() {
        let config = RedactionConfig {
            pii_fields: vec!["name".to_string(), String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = RedactionConfig::default()
            .apply_overrides(lookup(&[
                (ENV_FIELDS, "email, ssn,"),
                (ENV_REDACTION, "[X]"),
                (ENV_SEPARATOR, "|"),
                (ENV_HASH_COST, "10"),
            ]))
            .unwrap();
        assert_eq!(config.pii_fields, ["email", "ssn"]);
        assert_eq!(config.redaction, "[X]");
        assert_eq!(config.separator, "|");
        assert_eq!(config.hash_cost, 10);
    }

    #[test]
    fn test_override_bad_cost() {
        let err = RedactionConfig::default()
            .apply_overrides(lookup(&[(ENV_HASH_COST, "lots")]))
            .unwrap_err();
        assert!(matches!(err, RedactionError::InvalidConfig(_)));
    }

    #[test]
    fn test_override_empty_separator_rejected() {
        assert!(RedactionConfig::default()
            .apply_overrides(lookup(&[(ENV_SEPARATOR, "")]))
            .is_err());
    }

    #[test]
    fn test_formatter_from_config() {
        let config = RedactionConfig {
            pii_fields: vec!["ip".to_string()],
            ..Default::default()
        };
        let redactor = config.redactor().unwrap();
        assert_eq!(redactor.redact("ip=1.2.3.4;name=x;"), "ip=***;name=x;");
    }
}
