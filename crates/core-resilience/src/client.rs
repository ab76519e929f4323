//! Capabilities a remote-service client must provide to be wrapped

use crate::error::ServiceError;
use crate::state::ConnectionState;

/// A stateful, connection-oriented remote-service client
///
/// The operation surface itself (e.g. `add_author`) is whatever the
/// implementing type exposes; the wrapper hands out `&mut Self` to the
/// operation closure and only relies on the lifecycle methods below.
pub trait RemoteClient {
    /// Current lifecycle state
    fn state(&self) -> ConnectionState;

    /// Gracefully shut the connection down
    ///
    /// May fail, e.g. when the client is faulted or the peer is gone.
    /// Must be safe to call on an already closed client.
    fn close(&mut self) -> Result<(), ServiceError>;

    /// Discard the connection without any shutdown protocol
    fn abort(&mut self);
}

/// A client that can be built from an explicit transport configuration
pub trait ConfigurableClient: RemoteClient + Sized {
    /// Transport binding (timeouts, security, framing...)
    type Binding: Clone;
    /// Endpoint address
    type Endpoint: Clone;

    /// Construct a new client, not yet opened
    fn from_transport(binding: Self::Binding, endpoint: Self::Endpoint) -> Self;
}
