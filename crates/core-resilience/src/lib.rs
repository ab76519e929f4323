//! Spike Core Resilience: Pure-logic resilient client wrapper
//!
//! # Overview
//!
//! This crate wraps a single stateful, connection-oriented remote-service
//! client and makes calls through it resilient:
//!
//! - **Connection State**: six-value lifecycle with a readiness predicate
//! - **Connection Factory**: lazy construction from defaults, an explicit
//!   binding + endpoint, or a caller-supplied closure
//! - **Disposer**: graceful close, forced abort for faulted clients, never fails
//! - **Retry Executor**: health gate, bounded retries with a fixed cooldown,
//!   failure hook with error override, per-attempt logging
//!
//! # Key Principles
//!
//! This crate is **pure logic** with zero knowledge of:
//! - Transports (TCP, HTTP, named pipes)
//! - Wire formats
//! - Application-specific concerns
//!
//! Everything protocol-specific lives behind the [`RemoteClient`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Your Application                │
//! └─────────────┬───────────────────────────┘
//!               │ execute(Invocation)
//!               ▼
//! ┌─────────────────────────────────────────┐
//! │       Retry Executor                    │  ← Bounded retries + cooldown
//! │  (hook, logging, error override)        │
//! └─────────────┬───────────────────────────┘
//!               │
//!               ▼
//! ┌─────────────────────────────────────────┐
//! │       Health Gate                       │  ← Created | Opening | Opened
//! │  (dispose + rebuild when not ready)     │
//! └─────────────┬───────────────────────────┘
//!               │
//!               ▼
//! ┌─────────────────────────────────────────┐
//! │       Connection Factory / Disposer     │  ← One client at a time
//! │  (lazy build, close or abort)           │
//! └─────────────┬───────────────────────────┘
//!               │
//!               ▼
//!         Remote Service
//! ```
//!
//! # Usage Example
//!
//! ```
//! use spike_core_resilience::{
//!     ConnectionState, Invocation, RemoteClient, ServiceClientWrapper, ServiceError,
//! };
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct AuthorClient {
//!     state: Option<ConnectionState>,
//! }
//!
//! impl AuthorClient {
//!     fn add_author(&mut self, name: &str) -> Result<u64, ServiceError> {
//!         self.state = Some(ConnectionState::Opened);
//!         Ok(name.len() as u64)
//!     }
//! }
//!
//! impl RemoteClient for AuthorClient {
//!     fn state(&self) -> ConnectionState {
//!         self.state.unwrap_or(ConnectionState::Created)
//!     }
//!     fn close(&mut self) -> Result<(), ServiceError> {
//!         self.state = Some(ConnectionState::Closed);
//!         Ok(())
//!     }
//!     fn abort(&mut self) {
//!         self.state = Some(ConnectionState::Closed);
//!     }
//! }
//!
//! # fn main() -> Result<(), ServiceError> {
//! let mut consumer = ServiceClientWrapper::<AuthorClient>::new();
//!
//! let id = consumer.execute(
//!     Invocation::new("add_author", |svc: &mut AuthorClient| svc.add_author("Le Guin"))
//!         .attempts(3)
//!         .cooldown(Duration::from_millis(250)),
//! )?;
//! assert_eq!(id, 7);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod disposer;
pub mod error;
pub mod factory;
pub mod logger;
pub mod policy;
pub mod state;
pub mod wrapper;

// Re-export main types for convenience
pub use client::{ConfigurableClient, RemoteClient};
pub use error::ServiceError;
pub use factory::{ConnectionFactory, FactorySource};
pub use logger::{MemoryLogger, OperationLogger, TracingLogger};
pub use policy::{RetryPolicy, DEFAULT_COOLDOWN};
pub use state::ConnectionState;
pub use wrapper::{Invocation, ServiceClientWrapper};

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use spike_core_resilience::prelude::*;
/// ```
pub mod prelude {
    pub use super::client::{ConfigurableClient, RemoteClient};
    pub use super::error::ServiceError;
    pub use super::logger::{MemoryLogger, OperationLogger, TracingLogger};
    pub use super::policy::RetryPolicy;
    pub use super::state::ConnectionState;
    pub use super::wrapper::{Invocation, ServiceClientWrapper};
}
