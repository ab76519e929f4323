/*!
 * Configuration types for Spike
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{EnumIter, EnumMessage, IntoStaticStr};
use std::time::Duration;

use spike_core_resilience::RetryPolicy;

use crate::enums;
use crate::error::{Result, SpikeError};
use crate::transport::{EndpointAddress, TcpBinding, DEFAULT_ENDPOINT};

/// Main configuration for remote calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service endpoint as `host:port`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Read timeout in milliseconds (0 = wait forever)
    #[serde(default = "default_io_timeout")]
    pub read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 = wait forever)
    #[serde(default = "default_io_timeout")]
    pub write_timeout_ms: u64,

    /// Total number of attempts per operation
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Pause between attempts in milliseconds
    #[serde(default = "default_cooldown")]
    pub retry_cooldown_ms: u64,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout(),
            read_timeout_ms: default_io_timeout(),
            write_timeout_ms: default_io_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_cooldown_ms: default_cooldown(),
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
        }
    }
}

/// Log level for diagnostic output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, EnumMessage,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    #[strum(message = "Only errors")]
    Error,

    #[strum(message = "Warnings and errors")]
    Warn,

    #[default]
    #[strum(message = "Info, warnings, and errors")]
    Info,

    #[strum(message = "Debug and above")]
    Debug,

    #[strum(message = "All messages including traces")]
    Trace,
}

impl LogLevel {
    /// Parse a level by name (`warn`) or description (`warnings and errors`)
    pub fn parse_or(value: &str, default: LogLevel) -> LogLevel {
        enums::parse_enum(value).unwrap_or_else(|| enums::parse_from_description(value, default))
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_connect_timeout() -> u64 {
    5_000
}

fn default_io_timeout() -> u64 {
    30_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_cooldown() -> u64 {
    1_000
}

fn optional_timeout(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.retry_attempts == 0 {
            return Err(SpikeError::Config(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.connect_timeout_ms == 0 {
            return Err(SpikeError::Config(
                "connect_timeout_ms must be greater than 0".to_string(),
            ));
        }
        self.endpoint()?;
        Ok(())
    }

    /// Parsed service endpoint
    pub fn endpoint(&self) -> Result<EndpointAddress> {
        self.endpoint.parse()
    }

    /// Socket settings for new connections
    pub fn binding(&self) -> TcpBinding {
        TcpBinding {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: optional_timeout(self.read_timeout_ms),
            write_timeout: optional_timeout(self.write_timeout_ms),
        }
    }

    /// Retry policy for operations
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts)
            .with_cooldown(Duration::from_millis(self.retry_cooldown_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let config = ClientConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let deserialized: ClientConfig = toml::from_str(&toml).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = ClientConfig {
            retry_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SpikeError::Config(_))));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let config = ClientConfig {
            endpoint: "no-port-here".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SpikeError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_projections() {
        let config = ClientConfig {
            read_timeout_ms: 0,
            retry_attempts: 4,
            retry_cooldown_ms: 250,
            ..Default::default()
        };

        let binding = config.binding();
        assert_eq!(binding.connect_timeout, Duration::from_secs(5));
        assert_eq!(binding.read_timeout, None);
        assert_eq!(binding.write_timeout, Some(Duration::from_secs(30)));

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.cooldown, Duration::from_millis(250));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_log_level_parse_by_name_or_description() {
        assert_eq!(LogLevel::parse_or("WARN", LogLevel::Info), LogLevel::Warn);
        assert_eq!(
            LogLevel::parse_or("debug and above", LogLevel::Info),
            LogLevel::Debug
        );
        assert_eq!(LogLevel::parse_or("chatty", LogLevel::Error), LogLevel::Error);
    }

    #[test]
    fn test_log_level_description() {
        assert_eq!(enums::to_description(LogLevel::Warn), "Warnings and errors");
        assert_eq!(enums::to_description(LogLevel::Trace), "All messages including traces");
    }

    #[test]
    fn test_readme_config_example() {
        let toml_str = r#"
endpoint = "authors.internal:9100"
connect_timeout_ms = 2000
read_timeout_ms = 10000
retry_attempts = 5
retry_cooldown_ms = 500
log_level = "debug"
log_file = "/var/log/spike.log"
"#;

        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint().unwrap().host(), "authors.internal");
        assert_eq!(config.connect_timeout_ms, 2000);
        assert_eq!(config.read_timeout_ms, 10000);
        assert_eq!(config.write_timeout_ms, 30_000);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_cooldown_ms, 500);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/spike.log")));
        assert!(!config.verbose);
    }
}
