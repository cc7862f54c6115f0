//! Deserializable wrapper settings
//!
//! Retry and tracing parameters can live in a TOML document instead of code:
//!
//! ```toml
//! [retry]
//! timeout_ms = 30000
//! initial_delay_ms = 200
//! max_delay_ms = 5000
//! label = "billing"
//!
//! [trace]
//! severity = "info"
//! log_args = true
//! ```
//!
//! Settings only carry plain values. They are turned into a
//! [`RetryConfigBuilder`] or a [`TraceConfig`], so failure kinds, retry
//! filters, sinks and clocks are still attached in code, and the builder's
//! validation applies unchanged.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigError;
use crate::observability::Severity;
use crate::resilience::{Failure, RetryConfig, RetryConfigBuilder};
use crate::utils::duration_millis;
use crate::wrappers::TraceConfig;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid TOML or does not match the schema
    #[error("invalid settings document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but describe an invalid retry configuration
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Retry parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    /// Retry window budget, `timeout_ms` in documents
    #[serde(rename = "timeout_ms", with = "duration_millis")]
    pub timeout: Duration,
    /// First retry delay, `initial_delay_ms` in documents
    #[serde(rename = "initial_delay_ms", with = "duration_millis")]
    pub initial_delay: Duration,
    /// Backoff ceiling, `max_delay_ms` in documents
    #[serde(rename = "max_delay_ms", with = "duration_millis")]
    pub max_delay: Duration,
    /// Correlation label prefixed to attempt messages
    pub label: String,
    /// Attach stack snapshots to failure records
    pub capture_stack: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            label: String::new(),
            capture_stack: true,
        }
    }
}

impl RetrySettings {
    /// Parse a document holding these fields at the top level
    pub fn from_toml_str(document: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(document)?)
    }

    /// Builder seeded with these settings
    pub fn into_builder<E: Failure, A>(self) -> RetryConfigBuilder<E, A> {
        RetryConfig::builder()
            .timeout(self.timeout)
            .initial_delay(self.initial_delay)
            .max_delay(self.max_delay)
            .label(self.label)
            .capture_stack(self.capture_stack)
    }

    /// Validated configuration with every other option at its default
    pub fn build<E: Failure, A>(self) -> Result<RetryConfig<E, A>, SettingsError> {
        Ok(self.into_builder().build()?)
    }
}

/// Entry/exit tracing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceSettings {
    /// `false` turns tracing off regardless of `severity`
    pub enabled: bool,
    /// Severity of the entry and exit records
    pub severity: Severity,
    /// Include the call arguments
    pub log_args: bool,
    /// Attach stack snapshots
    pub log_stack: bool,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self { enabled: true, severity: Severity::Debug, log_args: false, log_stack: false }
    }
}

impl TraceSettings {
    /// Parse a document holding these fields at the top level
    pub fn from_toml_str(document: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(document)?)
    }

    /// Tracer settings equivalent to these values
    pub fn into_config(self) -> TraceConfig {
        TraceConfig {
            severity: self.enabled.then_some(self.severity),
            log_args: self.log_args,
            log_stack: self.log_stack,
        }
    }
}

impl From<TraceSettings> for TraceConfig {
    fn from(settings: TraceSettings) -> Self {
        settings.into_config()
    }
}

/// A settings document with optional `[retry]` and `[trace]` tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapperSettings {
    /// The `[retry]` table
    pub retry: RetrySettings,
    /// The `[trace]` table
    pub trace: TraceSettings,
}

impl WrapperSettings {
    /// Parse a TOML document
    pub fn from_toml_str(document: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(document)?)
    }

    /// Read and parse a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&document)?;
        tracing::debug!(path = %path.display(), "Wrapper settings loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for config.
    use std::io;

    use super::*;

    /// Validates every retry field is read from milliseconds.
    #[test]
    fn test_retry_settings_from_toml() {
        let settings = RetrySettings::from_toml_str(
            r#"
            timeout_ms = 1000
            initial_delay_ms = 200
            max_delay_ms = 800
            label = "billing"
            capture_stack = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.timeout, Duration::from_secs(1));
        assert_eq!(settings.initial_delay, Duration::from_millis(200));
        assert_eq!(settings.max_delay, Duration::from_millis(800));
        assert_eq!(settings.label, "billing");
        assert!(!settings.capture_stack);
    }

    /// Validates omitted fields fall back to defaults.
    #[test]
    fn test_defaults_for_missing_fields() {
        let settings = RetrySettings::from_toml_str("label = \"x\"").unwrap();
        assert_eq!(settings, RetrySettings { label: "x".to_string(), ..RetrySettings::default() });

        let trace = TraceSettings::from_toml_str("").unwrap();
        assert_eq!(trace.into_config(), TraceConfig::default());
    }

    /// Validates invalid values surface the builder's error.
    #[test]
    fn test_invalid_values_rejected() {
        let settings = RetrySettings::from_toml_str("initial_delay_ms = 0").unwrap();
        let err = settings.build::<io::Error, ()>().unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::NonPositiveInitialDelay { .. })));

        let err = RetrySettings::from_toml_str("retries = 3").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    /// Validates trace settings map onto `TraceConfig`.
    #[test]
    fn test_trace_settings_into_config() {
        let settings = WrapperSettings::from_toml_str(
            r#"
            [trace]
            severity = "warning"
            log_stack = true
            "#,
        )
        .unwrap();
        let config = TraceConfig::from(settings.trace);

        assert_eq!(config.severity, Some(Severity::Warning));
        assert!(config.log_stack);
        assert!(!config.log_args);

        let off = TraceSettings { enabled: false, ..TraceSettings::default() };
        assert_eq!(off.into_config().severity, None);
    }
}
