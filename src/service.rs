/*!
 * Resilient calls against the line service
 *
 * Glue between the configuration and the wrapper: every call goes through
 * a `ServiceClientWrapper<LineClient>` using the configured retry policy.
 */

use std::path::Path;

use spike_core_resilience::{Invocation, RetryPolicy, ServiceClientWrapper, ServiceError};

use crate::config::ClientConfig;
use crate::csv_import::{Columns, Counters, CsvImporter, FromColumns};
use crate::error::Result;
use crate::transport::LineClient;

/// Column positions of a batch request file
#[derive(Debug, Clone, Copy)]
pub enum RequestColumn {
    Message = 0,
    Expect = 1,
}

/// One line of a batch: the request and, optionally, the reply it must get
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub message: String,
    pub expect: Option<String>,
}

impl FromColumns for RequestRow {
    fn from_columns(columns: &Columns<'_>) -> Result<Self> {
        let message = columns.get(RequestColumn::Message as usize)?.trim().to_string();
        let expect = columns
            .get_opt(RequestColumn::Expect as usize)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(Self { message, expect })
    }
}

/// Resilient handle to the configured line service
#[derive(Debug)]
pub struct LineService {
    wrapper: ServiceClientWrapper<LineClient>,
    policy: RetryPolicy,
}

impl LineService {
    /// Build from configuration; no connection is made yet
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let wrapper = ServiceClientWrapper::with_transport(config.binding(), config.endpoint()?);
        Ok(Self::new(wrapper, config.retry_policy()))
    }

    pub fn new(wrapper: ServiceClientWrapper<LineClient>, policy: RetryPolicy) -> Self {
        Self { wrapper, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Send one line and return the reply
    pub fn send(&mut self, message: &str) -> Result<String> {
        let invocation = Invocation::new("send", |client: &mut LineClient| client.request(message))
            .with_policy(self.policy)
            .on_failure(|err| {
                tracing::debug!(error = %err, "send attempt failed");
                Ok(())
            });
        Ok(self.wrapper.execute(invocation)?)
    }

    /// Check the service answers `PING`
    pub fn ping(&mut self) -> Result<()> {
        let invocation = Invocation::new("ping", |client: &mut LineClient| client.ping())
            .with_policy(self.policy)
            .on_failure(|err| match err {
                ServiceError::InvalidState(state) => Err(ServiceError::communication(format!(
                    "service unreachable, client left in state {}",
                    state
                ))),
                _ => Ok(()),
            });
        Ok(self.wrapper.execute(invocation)?)
    }

    /// Send every row of a request file
    ///
    /// Rows whose message starts with `#` are skipped. A row fails when the
    /// call fails or the reply differs from its expected value; the batch
    /// carries on either way. The connection is torn down at the end.
    pub fn send_batch(
        &mut self,
        path: &Path,
        importer: &CsvImporter,
        skip_lines: usize,
    ) -> Result<Counters> {
        tracing::info!(
            path = %path.display(),
            attempts = self.policy().max_attempts,
            "Starting batch"
        );

        let result = importer.import(path, skip_lines, |row: RequestRow, counters| {
            if row.message.starts_with('#') {
                counters.skipped += 1;
                return;
            }
            match self.send(&row.message) {
                Ok(reply) => match row.expect {
                    Some(ref expected) if *expected != reply => {
                        tracing::warn!(
                            message = %row.message,
                            expected = %expected,
                            reply = %reply,
                            "Unexpected reply"
                        );
                        counters.failed += 1;
                    }
                    _ => counters.success += 1,
                },
                Err(e) => {
                    tracing::warn!(message = %row.message, error = %e, "Request failed");
                    counters.failed += 1;
                }
            }
        });

        self.disconnect();
        let counters = result?;
        tracing::info!("{}", counters);
        Ok(counters)
    }

    /// Tear down the current connection, if any
    pub fn disconnect(&mut self) {
        self.wrapper.dispose();
    }
}
