/*!
 * Error types for Spike
 */

use std::fmt;
use std::io;

use spike_core_resilience::ServiceError;

pub type Result<T> = std::result::Result<T, SpikeError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_FAULT: i32 = 3;

#[derive(Debug)]
pub enum SpikeError {
    /// Configuration error
    Config(String),

    /// Endpoint address could not be parsed
    InvalidEndpoint(String),

    /// I/O error outside of a remote call (config files, log files)
    Io(io::Error),

    /// Remote call failed
    Service(ServiceError),

    /// A row of an import file could not be read or mapped
    Import { line: u64, message: String },

    /// A batch finished with failed rows
    BatchIncomplete { failed: usize, total: usize },
}

impl SpikeError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SpikeError::Config(_)
            | SpikeError::InvalidEndpoint(_)
            | SpikeError::Io(_)
            | SpikeError::Import { .. } => EXIT_FATAL,
            SpikeError::BatchIncomplete { .. } => EXIT_FAILURE,
            SpikeError::Service(err) => match err.root_cause() {
                ServiceError::Fault(_) => EXIT_FAULT,
                _ => EXIT_FAILURE,
            },
        }
    }

    /// Check if the remote side reported an application fault
    pub fn is_fault(&self) -> bool {
        matches!(self, SpikeError::Service(err) if matches!(err.root_cause(), ServiceError::Fault(_)))
    }
}

impl fmt::Display for SpikeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpikeError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            SpikeError::InvalidEndpoint(addr) => {
                write!(f, "Invalid endpoint address: {}", addr)
            }
            SpikeError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            SpikeError::Service(err) => {
                write!(f, "{}", err)
            }
            SpikeError::Import { line, message } => {
                write!(f, "Import error at line {}: {}", line, message)
            }
            SpikeError::BatchIncomplete { failed, total } => {
                write!(f, "Batch incomplete: {} of {} rows failed", failed, total)
            }
        }
    }
}

impl std::error::Error for SpikeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpikeError::Io(err) => Some(err),
            SpikeError::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SpikeError {
    fn from(err: io::Error) -> Self {
        SpikeError::Io(err)
    }
}

impl From<ServiceError> for SpikeError {
    fn from(err: ServiceError) -> Self {
        SpikeError::Service(err)
    }
}

impl From<csv::Error> for SpikeError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        if !err.is_io_error() {
            return SpikeError::Import {
                line,
                message: err.to_string(),
            };
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => SpikeError::Io(io_err),
            kind => SpikeError::Import {
                line,
                message: format!("{:?}", kind),
            },
        }
    }
}

impl From<toml::de::Error> for SpikeError {
    fn from(err: toml::de::Error) -> Self {
        SpikeError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for SpikeError {
    fn from(err: toml::ser::Error) -> Self {
        SpikeError::Config(format!("TOML serialize error: {}", err))
    }
}
