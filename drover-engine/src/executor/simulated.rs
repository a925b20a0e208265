//! Simulated executor
//!
//! Stands in for a real authentication strategy: waits a fixed latency and
//! draws an outcome at random. Useful for dry runs of a batch and for load
//! testing the orchestration.

use async_trait::async_trait;
use drover_core::domain::outcome::{AttemptOutcome, FailureKind};
use drover_core::domain::proxy::ProxyHandle;
use drover_core::domain::record::Record;
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::debug;

use super::AttemptExecutor;

const SIMULATED_FAILURES: [FailureKind; 4] = [
    FailureKind::InvalidCredentials,
    FailureKind::ChallengeRequired,
    FailureKind::ProxyError,
    FailureKind::NetworkTimeout,
];

/// Executor producing random outcomes after a fixed latency
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    latency: Duration,
    success_ratio: f64,
}

impl SimulatedExecutor {
    /// Creates a simulated executor
    ///
    /// # Arguments
    /// * `latency` - How long each attempt takes
    /// * `success_ratio` - Probability of `Success`, clamped to `[0, 1]`;
    ///   NaN counts as `0`
    pub fn new(latency: Duration, success_ratio: f64) -> Self {
        let success_ratio = if success_ratio.is_nan() {
            0.0
        } else {
            success_ratio.clamp(0.0, 1.0)
        };
        Self {
            latency,
            success_ratio,
        }
    }

    fn draw(&self) -> AttemptOutcome {
        let mut rng = rand::thread_rng();
        if rng.gen_bool(self.success_ratio) {
            AttemptOutcome::Success
        } else {
            let kind = SIMULATED_FAILURES
                .choose(&mut rng)
                .copied()
                .unwrap_or(FailureKind::Unknown);
            AttemptOutcome::Failure(kind)
        }
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 1.0)
    }
}

#[async_trait]
impl AttemptExecutor for SimulatedExecutor {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn attempt(&self, record: &Record, proxy: &ProxyHandle) -> anyhow::Result<AttemptOutcome> {
        debug!(
            "Simulating attempt for {} via {}",
            record.identifier, proxy.endpoint
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(self.draw())
    }
}
