//! Lazy construction of connection handles

use crate::client::{ConfigurableClient, RemoteClient};

type BuildFn<C> = Box<dyn FnMut() -> C + Send>;

/// Builds a fresh client whenever the wrapper's slot is empty
pub struct ConnectionFactory<C> {
    build: BuildFn<C>,
    source: FactorySource,
}

/// Where new clients get their configuration from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorySource {
    /// Parameterless default construction
    Default,
    /// Binding + endpoint supplied at wrapper construction
    Transport,
    /// Caller-supplied closure
    Custom,
}

impl<C: RemoteClient> ConnectionFactory<C> {
    /// Use the client's `Default` implementation
    pub fn default_config() -> Self
    where
        C: Default + 'static,
    {
        Self {
            build: Box::new(C::default),
            source: FactorySource::Default,
        }
    }

    /// Use an explicit binding and endpoint for every new client
    pub fn with_transport(binding: C::Binding, endpoint: C::Endpoint) -> Self
    where
        C: ConfigurableClient + 'static,
        C::Binding: Send + 'static,
        C::Endpoint: Send + 'static,
    {
        Self {
            build: Box::new(move || C::from_transport(binding.clone(), endpoint.clone())),
            source: FactorySource::Transport,
        }
    }

    /// Use a caller-supplied constructor
    pub fn from_fn<F>(build: F) -> Self
    where
        F: FnMut() -> C + Send + 'static,
    {
        Self {
            build: Box::new(build),
            source: FactorySource::Custom,
        }
    }

    /// Which construction path this factory takes
    pub fn source(&self) -> FactorySource {
        self.source
    }

    /// Return the cached client, constructing one if the slot is empty
    pub fn get_or_create<'s>(&mut self, slot: &'s mut Option<C>) -> &'s mut C {
        slot.get_or_insert_with(|| {
            tracing::debug!(source = ?self.source, "Creating service client");
            (self.build)()
        })
    }
}

impl<C> std::fmt::Debug for ConnectionFactory<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::state::ConnectionState;

    #[derive(Debug, Default)]
    struct StubClient {
        endpoint: Option<String>,
    }

    impl RemoteClient for StubClient {
        fn state(&self) -> ConnectionState {
            ConnectionState::Created
        }

        fn close(&mut self) -> Result<(), ServiceError> {
            Ok(())
        }

        fn abort(&mut self) {}
    }

    impl ConfigurableClient for StubClient {
        type Binding = ();
        type Endpoint = String;

        fn from_transport(_binding: (), endpoint: String) -> Self {
            Self {
                endpoint: Some(endpoint),
            }
        }
    }

    #[test]
    fn test_default_construction() {
        let mut factory = ConnectionFactory::<StubClient>::default_config();
        let mut slot = None;

        let client = factory.get_or_create(&mut slot);
        assert!(client.endpoint.is_none());
        assert_eq!(factory.source(), FactorySource::Default);
    }

    #[test]
    fn test_transport_construction() {
        let mut factory =
            ConnectionFactory::<StubClient>::with_transport((), "svc.local:7000".to_string());
        let mut slot = None;

        let client = factory.get_or_create(&mut slot);
        assert_eq!(client.endpoint.as_deref(), Some("svc.local:7000"));
    }

    #[test]
    fn test_cached_until_cleared() {
        let mut built = 0;
        let mut factory = ConnectionFactory::from_fn(move || {
            built += 1;
            StubClient {
                endpoint: Some(format!("build-{}", built)),
            }
        });
        let mut slot = None;

        factory.get_or_create(&mut slot);
        let second = factory.get_or_create(&mut slot);
        assert_eq!(second.endpoint.as_deref(), Some("build-1"));

        slot = None;
        let third = factory.get_or_create(&mut slot);
        assert_eq!(third.endpoint.as_deref(), Some("build-2"));
    }
}
