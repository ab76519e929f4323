//! Connection lifecycle states and the readiness predicate

use std::fmt;

/// Lifecycle state of a remote-service client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Constructed, not yet opened
    Created,
    /// Open in progress
    Opening,
    /// Open and usable
    Opened,
    /// Graceful close in progress
    Closing,
    /// Closed or aborted
    Closed,
    /// Broken by a communication failure; can only be aborted
    Faulted,
}

impl ConnectionState {
    /// Whether a client in this state may be used to invoke an operation
    pub fn is_ready(self) -> bool {
        match self {
            ConnectionState::Created | ConnectionState::Opening | ConnectionState::Opened => true,
            ConnectionState::Closing | ConnectionState::Closed | ConnectionState::Faulted => false,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Created => "Created",
            ConnectionState::Opening => "Opening",
            ConnectionState::Opened => "Opened",
            ConnectionState::Closing => "Closing",
            ConnectionState::Closed => "Closed",
            ConnectionState::Faulted => "Faulted",
        };
        f.write_str(name)
    }
}
