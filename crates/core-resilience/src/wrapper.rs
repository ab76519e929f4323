//! Resilient wrapper around a single remote-service client
//!
//! The wrapper owns at most one client at a time. Before every attempt the
//! client's state is checked; an unusable client is disposed and rebuilt.
//! Retryable failures are counted against the invocation's [`RetryPolicy`]
//! with a fixed, blocking cooldown between attempts. The client is torn
//! down on every exit path: closed after success, released after failure,
//! released when the wrapper is dropped.

use crate::client::{ConfigurableClient, RemoteClient};
use crate::disposer;
use crate::error::ServiceError;
use crate::factory::ConnectionFactory;
use crate::logger::{OperationLogger, TracingLogger};
use crate::policy::RetryPolicy;
use crate::state::ConnectionState;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

type Call<'a, C, T> = Box<dyn FnMut(&mut C) -> Result<T, ServiceError> + 'a>;
type FailureHook<'a> = Box<dyn FnMut(&ServiceError) -> Result<(), ServiceError> + 'a>;

/// One remote operation plus how to retry it
///
/// # Example
/// ```
/// use spike_core_resilience::{Invocation, RetryPolicy, ServiceError};
/// use std::time::Duration;
///
/// struct Client;
/// impl Client {
///     fn ping(&mut self) -> Result<&'static str, ServiceError> { Ok("PONG") }
/// }
///
/// let _invocation = Invocation::new("ping", |c: &mut Client| c.ping())
///     .with_policy(RetryPolicy::new(3).with_cooldown(Duration::from_millis(100)))
///     .on_failure(|e| Err(ServiceError::fault(format!("ping failed: {}", e))));
/// ```
pub struct Invocation<'a, C, T> {
    operation: String,
    call: Call<'a, C, T>,
    policy: RetryPolicy,
    on_failure: Option<FailureHook<'a>>,
}

impl<'a, C, T> Invocation<'a, C, T> {
    /// Single attempt of `call`, reported as `operation` in logs and errors
    pub fn new<F>(operation: impl Into<String>, call: F) -> Self
    where
        F: FnMut(&mut C) -> Result<T, ServiceError> + 'a,
    {
        Self {
            operation: operation.into(),
            call: Box::new(call),
            policy: RetryPolicy::default(),
            on_failure: None,
        }
    }

    /// Total attempt budget
    pub fn attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts;
        self
    }

    /// Pause between attempts
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.policy.cooldown = cooldown;
        self
    }

    /// Replace the whole retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Hook invoked with every retryable failure
    ///
    /// Returning `Err` replaces the error that will be reported if the
    /// budget runs out.
    pub fn on_failure<H>(mut self, hook: H) -> Self
    where
        H: FnMut(&ServiceError) -> Result<(), ServiceError> + 'a,
    {
        self.on_failure = Some(Box::new(hook));
        self
    }
}

/// Owns one remote-service client and drives operations through it
///
/// All operations take `&mut self`: one wrapper serves one caller at a
/// time. Share across threads with a `Mutex` or give each flow its own.
pub struct ServiceClientWrapper<C: RemoteClient> {
    client: Option<C>,
    factory: ConnectionFactory<C>,
    logger: Arc<dyn OperationLogger>,
}

impl<C: RemoteClient> ServiceClientWrapper<C> {
    /// Wrapper whose clients use the parameterless default construction
    pub fn new() -> Self
    where
        C: Default + 'static,
    {
        Self::from_factory(ConnectionFactory::default_config())
    }

    /// Wrapper whose clients are built from `binding` and `endpoint`
    pub fn with_transport(binding: C::Binding, endpoint: C::Endpoint) -> Self
    where
        C: ConfigurableClient + 'static,
        C::Binding: Send + 'static,
        C::Endpoint: Send + 'static,
    {
        Self::from_factory(ConnectionFactory::with_transport(binding, endpoint))
    }

    /// Wrapper whose clients come from `build`
    pub fn with_factory<F>(build: F) -> Self
    where
        F: FnMut() -> C + Send + 'static,
    {
        Self::from_factory(ConnectionFactory::from_fn(build))
    }

    pub fn from_factory(factory: ConnectionFactory<C>) -> Self {
        Self {
            client: None,
            factory,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the attempt logger
    pub fn with_logger(mut self, logger: impl OperationLogger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// The current client, constructed on first access
    pub fn client(&mut self) -> &mut C {
        self.factory.get_or_create(&mut self.client)
    }

    /// State of the current client without constructing one
    pub fn state(&self) -> Option<ConnectionState> {
        self.client.as_ref().map(|client| client.state())
    }

    /// Whether a client is currently held
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Release the current client; the next access builds a new one
    pub fn dispose(&mut self) {
        disposer::release(&mut self.client);
    }

    /// Run `invocation`, retrying retryable failures within its budget
    ///
    /// On success the client is closed gracefully and kept until the next
    /// call replaces it. If the operation succeeded but left the client
    /// `Faulted`, or the graceful close fails, the client is aborted
    /// instead; the result is returned either way. A
    /// [`ServiceError::Fault`] is returned as-is after one attempt.
    /// Exhausting the budget yields
    /// [`ServiceError::RetryExhausted`] carrying the last error, or the
    /// failure hook's replacement for it.
    pub fn execute<T>(&mut self, invocation: Invocation<'_, C, T>) -> Result<T, ServiceError> {
        let Invocation {
            operation,
            mut call,
            policy,
            mut on_failure,
        } = invocation;
        let service = std::any::type_name::<C>();

        let mut errors = 0u32;
        let mut last: Option<ServiceError> = None;

        while errors < policy.max_attempts {
            let outcome = self.ready_client().and_then(|client| call(client));

            match outcome {
                Ok(value) => {
                    if let Some(client) = self.client.as_mut() {
                        disposer::shutdown(client);
                    }
                    return Ok(value);
                }
                Err(error) if error.is_retryable() => {
                    let reported = match on_failure.as_mut().map(|hook| hook(&error)) {
                        Some(Err(replacement)) => replacement,
                        _ => error.clone(),
                    };
                    errors += 1;

                    let mut line = format!(
                        "Operation failure: Service [{}].[{}] Attempt ({}/{}). Exception [{}]",
                        service, operation, errors, policy.max_attempts, error
                    );
                    if reported != error {
                        line.push_str(&format!(" Reported as [{}]", reported));
                    }
                    self.logger.info(&line);
                    last = Some(reported);

                    disposer::release(&mut self.client);

                    if policy.should_cool_down(errors) {
                        self.logger
                            .info(&format!("Retry cooldown initiated ({:?})", policy.cooldown));
                        thread::sleep(policy.cooldown);
                    }
                }
                Err(fault) => {
                    tracing::warn!(
                        service,
                        operation = %operation,
                        error = %fault,
                        "Non-retryable failure"
                    );
                    disposer::release(&mut self.client);
                    return Err(fault);
                }
            }
        }

        let last = last.unwrap_or_else(|| {
            ServiceError::Communication(format!(
                "Operation failure: Service [{}].[{}]",
                service, operation
            ))
        });
        Err(ServiceError::RetryExhausted {
            service: service.to_string(),
            operation,
            attempts: errors,
            last: Box::new(last),
        })
    }

    /// Current client if usable, otherwise one rebuilt from scratch
    fn ready_client(&mut self) -> Result<&mut C, ServiceError> {
        let state = self.factory.get_or_create(&mut self.client).state();
        if !state.is_ready() {
            disposer::release(&mut self.client);

            let state = self.factory.get_or_create(&mut self.client).state();
            if !state.is_ready() {
                return Err(ServiceError::InvalidState(state));
            }
        }
        Ok(self.factory.get_or_create(&mut self.client))
    }
}

impl<C: RemoteClient + Default + 'static> Default for ServiceClientWrapper<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RemoteClient> Drop for ServiceClientWrapper<C> {
    fn drop(&mut self) {
        disposer::release(&mut self.client);
    }
}

impl<C: RemoteClient> std::fmt::Debug for ServiceClientWrapper<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClientWrapper")
            .field("service", &std::any::type_name::<C>())
            .field("state", &self.state())
            .field("factory", &self.factory.source())
            .finish()
    }
}
