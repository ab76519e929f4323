/*!
 * Spike - resilient remote-service client
 *
 * A small client library and CLI built on `spike-core-resilience`:
 * - One owned connection, health-checked before each call
 * - Bounded retries with a fixed cooldown
 * - Graceful close or forced abort on every exit path
 * - TCP line-protocol transport
 * - CSV batch import of request lines
 * - TOML configuration and structured logging
 */

pub mod config;
pub mod csv_import;
pub mod enums;
pub mod error;
pub mod logging;
pub mod service;
pub mod transport;

// Re-export commonly used types
pub use config::{ClientConfig, LogLevel};
pub use csv_import::{Columns, Counters, CsvImporter, FromColumns};
pub use error::{Result, SpikeError};
pub use service::LineService;
pub use transport::{EndpointAddress, LineClient, TcpBinding};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
