//! Error types for the resilience module

use crate::state::ConnectionState;
use thiserror::Error;

/// Errors raised by remote operations and by the retry executor
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Transient communication failure that may be retried
    #[error("Communication failure: {0}")]
    Communication(String),

    /// The connection could not be brought into a usable state
    #[error("Client state is not valid. Connection status [{0}]")]
    InvalidState(ConnectionState),

    /// Application-level fault reported by the remote side, never retried
    #[error("Service fault: {0}")]
    Fault(String),

    /// Retry budget exhausted; carries the last recorded error
    #[error("Operation failure: Service [{service}].[{operation}] after {attempts} attempt(s): {last}")]
    RetryExhausted {
        service: String,
        operation: String,
        attempts: u32,
        last: Box<ServiceError>,
    },
}

impl ServiceError {
    /// Shorthand for a communication failure
    pub fn communication(message: impl Into<String>) -> Self {
        ServiceError::Communication(message.into())
    }

    /// Shorthand for an application fault
    pub fn fault(message: impl Into<String>) -> Self {
        ServiceError::Fault(message.into())
    }

    /// Check if this error is handled by the retry loop
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Communication(_) | ServiceError::InvalidState(_)
        )
    }

    /// The error that ended the last attempt, unwrapping `RetryExhausted`
    pub fn root_cause(&self) -> &ServiceError {
        match self {
            ServiceError::RetryExhausted { last, .. } => last.root_cause(),
            other => other,
        }
    }

    /// Number of attempts made before giving up, if this is a terminal error
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ServiceError::RetryExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let comms = ServiceError::communication("connection reset");
        assert!(comms.is_retryable());

        let invalid = ServiceError::InvalidState(ConnectionState::Faulted);
        assert!(invalid.is_retryable());

        let fault = ServiceError::fault("author already exists");
        assert!(!fault.is_retryable());
    }

    #[test]
    fn test_root_cause_unwraps_exhaustion() {
        let err = ServiceError::RetryExhausted {
            service: "AuthorClient".to_string(),
            operation: "add_author".to_string(),
            attempts: 3,
            last: Box::new(ServiceError::communication("timed out")),
        };

        assert_eq!(err.root_cause(), &ServiceError::communication("timed out"));
        assert_eq!(err.attempts(), Some(3));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_invalid_state_message_names_state() {
        let err = ServiceError::InvalidState(ConnectionState::Closed);
        assert_eq!(
            err.to_string(),
            "Client state is not valid. Connection status [Closed]"
        );
    }
}
