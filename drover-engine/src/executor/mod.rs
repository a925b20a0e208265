//! Attempt executors
//!
//! An executor performs one attempt for one record through one proxy. The
//! orchestration never knows which strategy is behind the trait, so a
//! simulated executor, a real strategy or a test double are interchangeable.

mod simulated;
mod timeout;

pub use simulated::SimulatedExecutor;
pub use timeout::TimeoutExecutor;

use async_trait::async_trait;
use drover_core::domain::outcome::AttemptOutcome;
use drover_core::domain::proxy::ProxyHandle;
use drover_core::domain::record::Record;

/// Strategy for attempting a single record
///
/// Expected failure modes (bad credentials, challenges, proxy or network
/// trouble) are reported as `Ok(AttemptOutcome::Failure(..))`. An `Err` means
/// the executor itself is broken and stops the calling worker.
///
/// Implementations are shared by all workers of a job and must be safe to
/// call concurrently. On success, any session material must be persisted
/// before returning.
#[async_trait]
pub trait AttemptExecutor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Attempts `record` through `proxy`
    async fn attempt(&self, record: &Record, proxy: &ProxyHandle) -> anyhow::Result<AttemptOutcome>;
}
