/*!
 * Logging and tracing initialization
 */

use std::fs::File;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::ClientConfig;
use crate::enums;
use crate::error::{Result, SpikeError};

/// Effective level after applying the verbose shorthand
pub fn effective_level(config: &ClientConfig) -> Level {
    if config.verbose {
        Level::DEBUG
    } else {
        config.log_level.to_tracing_level()
    }
}

/// Default filter directives covering the binary and the core crate
pub fn default_directives(level: Level) -> String {
    format!("spike={},spike_core_resilience={}", level, level)
}

/// Initialize structured logging based on configuration
pub fn init_logging(config: &ClientConfig) -> Result<()> {
    let directives = default_directives(effective_level(config));

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))
        .map_err(|e| SpikeError::Config(format!("Failed to create log filter: {}", e)))?;

    if let Some(ref log_path) = config.log_file {
        init_file_logging(log_path, env_filter)?;
    } else {
        init_stderr_logging(env_filter);
    }

    tracing::debug!(
        level = enums::to_description(config.log_level),
        verbose = config.verbose,
        "Logging initialized"
    );
    Ok(())
}

/// Initialize logging to stderr, keeping stdout for replies
fn init_stderr_logging(env_filter: EnvFilter) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Initialize logging to a file
fn init_file_logging(log_path: &Path, env_filter: EnvFilter) -> Result<()> {
    let file = File::create(log_path)
        .map_err(|e| SpikeError::Config(format!("Failed to create log file: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(file)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false) // No ANSI colors in file
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// Initialize logging with custom format for testing
#[cfg(test)]
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(Level::DEBUG)));

        let fmt_layer = fmt::layer().with_test_writer().with_target(false).compact();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .ok(); // Ignore error if already initialized
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_verbose_overrides_log_level() {
        let config = ClientConfig {
            log_level: LogLevel::Error,
            verbose: true,
            ..Default::default()
        };
        assert_eq!(effective_level(&config), Level::DEBUG);
    }

    #[test]
    fn test_configured_level_used() {
        let config = ClientConfig {
            log_level: LogLevel::Warn,
            ..Default::default()
        };
        assert_eq!(effective_level(&config), Level::WARN);
    }

    #[test]
    fn test_default_directives_parse() {
        let directives = default_directives(Level::INFO);
        assert_eq!(directives, "spike=INFO,spike_core_resilience=INFO");
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("test logging initialised");
    }
}
