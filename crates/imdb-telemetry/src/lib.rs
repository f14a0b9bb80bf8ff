//! IMDb Telemetry - logging setup shared by the library and the CLI.
//!
//! Logs are written to stderr so command output on stdout stays clean.
//!
//! ```rust,ignore
//! use imdb_telemetry::{TelemetryConfig, init_telemetry};
//!
//! init_telemetry(&TelemetryConfig::new("imdb").with_log_level("debug"))?;
//! tracing::info!(id = "nm0000206", "fetching person");
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod logging;

pub use logging::*;

/// Configuration for telemetry initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name recorded on startup.
    pub service_name: String,

    /// Log level filter (e.g., "info", "debug", "imdb_graphql=trace").
    /// `RUST_LOG` takes precedence when set.
    pub log_level: String,

    /// Enable JSON log output.
    pub json_logs: bool,

    /// Fields to redact when logging structured values.
    pub redact_fields: Vec<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "imdb".to_string(),
            log_level: "warn".to_string(),
            json_logs: false,
            redact_fields: DEFAULT_REDACT_FIELDS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl TelemetryConfig {
    /// Create a new configuration with the given service name.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable or disable JSON logs.
    #[must_use]
    pub const fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Add fields to redact from logs.
    #[must_use]
    pub fn with_redact_fields(mut self, fields: Vec<String>) -> Self {
        self.redact_fields.extend(fields);
        self
    }
}

/// Initialize logging.
///
/// Call once at startup; a second call fails because a global subscriber is
/// already installed.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)?;
    tracing::debug!(
        service = %config.service_name,
        json = config.json_logs,
        "telemetry initialized"
    );
    Ok(())
}

/// Telemetry error type.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_quiet_and_redacts_secrets() {
        let config = TelemetryConfig::default();

        assert_eq!(config.service_name, "imdb");
        assert_eq!(config.log_level, "warn");
        assert!(!config.json_logs);
        assert!(config.redact_fields.iter().any(|f| f == "password"));
    }

    #[test]
    fn builders_override_defaults() {
        let config = TelemetryConfig::new("imdb-cli")
            .with_log_level("debug")
            .with_json_logs(true)
            .with_redact_fields(vec!["ip_address".to_string()]);

        assert_eq!(config.service_name, "imdb-cli");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert!(config.redact_fields.iter().any(|f| f == "ip_address"));
    }
}
