//! Timeout decorator for executors

use async_trait::async_trait;
use drover_core::domain::outcome::{AttemptOutcome, FailureKind};
use drover_core::domain::proxy::ProxyHandle;
use drover_core::domain::record::Record;
use std::time::Duration;
use tracing::warn;

use super::AttemptExecutor;

/// Bounds every attempt of the wrapped executor
///
/// Attempts running past the limit are abandoned and reported as
/// `Failure(NetworkTimeout)`.
pub struct TimeoutExecutor<E> {
    inner: E,
    limit: Duration,
}

impl<E: AttemptExecutor> TimeoutExecutor<E> {
    pub fn new(inner: E, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<E: AttemptExecutor> AttemptExecutor for TimeoutExecutor<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn attempt(&self, record: &Record, proxy: &ProxyHandle) -> anyhow::Result<AttemptOutcome> {
        match tokio::time::timeout(self.limit, self.inner.attempt(record, proxy)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Attempt for {} via {} exceeded {:?}",
                    record.identifier, proxy.endpoint, self.limit
                );
                Ok(AttemptOutcome::Failure(FailureKind::NetworkTimeout))
            }
        }
    }
}
