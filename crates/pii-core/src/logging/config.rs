//! Diagnostic logging settings.
//!
//! The level comes from, highest first: `-v`/`-q`, `PII_LOG`, then the raw
//! `RUST_LOG` directives. `PII_LOG_FORMAT` or `--log-format` picks the sink.

use clap::ValueEnum;

/// Where diagnostics go and how they look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Plain tracing output
    #[default]
    Human,

    /// HOLBERTON-style lines with PII fields redacted
    Redacted,
}

/// Explicit verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Set by `PII_LOG` or a CLI flag; wins over `RUST_LOG`.
    pub level: Option<LogLevel>,
    /// `RUST_LOG` as given, used only when `level` is unset.
    pub rust_log: Option<String>,
}

impl LogConfig {
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Resolve settings against an arbitrary variable lookup.
    ///
    /// Unparseable `PII_LOG` or `PII_LOG_FORMAT` values are ignored.
    pub fn from_lookup<F>(
        lookup: F,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_level = lookup("PII_LOG").and_then(|v| LogLevel::from_str(v.trim(), true).ok());
        let env_format =
            lookup("PII_LOG_FORMAT").and_then(|v| LogFormat::from_str(v.trim(), true).ok());

        LogConfig {
            format: cli_format.or(env_format).unwrap_or_default(),
            level: cli_level.or(env_level),
            rust_log: lookup("RUST_LOG").filter(|v| !v.trim().is_empty()),
        }
    }

    /// Filter directives to install.
    pub fn directives(&self) -> String {
        match (&self.level, &self.rust_log) {
            (Some(level), _) => level.directive().to_string(),
            (None, Some(rust_log)) => rust_log.clone(),
            (None, None) => LogLevel::default().directive().to_string(),
        }
    }
}
