//! State-aware release of connection handles
//!
//! A faulted client is aborted outright. Anything else gets a graceful
//! close, with abort as the fallback when the close itself fails. The
//! owning slot is always emptied so the next access builds a new client.

use crate::client::RemoteClient;
use crate::state::ConnectionState;

/// Release the client held in `slot`, if any. Never fails.
pub fn release<C: RemoteClient>(slot: &mut Option<C>) {
    if let Some(mut client) = slot.take() {
        shutdown(&mut client);
    }
}

/// Close or abort `client` in place according to its state
///
/// Used on the success path where the closed client stays in the slot.
pub fn shutdown<C: RemoteClient>(client: &mut C) {
    match client.state() {
        ConnectionState::Faulted => {
            tracing::debug!("Aborting faulted service client");
            client.abort();
        }
        state => {
            if let Err(e) = client.close() {
                tracing::debug!(%state, error = %e, "Graceful close failed, aborting");
                client.abort();
            }
        }
    }
}
