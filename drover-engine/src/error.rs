//! Error types for the engine

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced to callers of the engine
///
/// Per-record failures never appear here; they are counted in the job state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input contained no usable entries
    #[error("Input contains no valid entries")]
    EmptyInput,

    /// A batch line could not be turned into a record
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    /// The proxy pool is empty
    #[error("No proxies loaded")]
    NoProxies,

    /// A job is already running or paused
    #[error("Job {0} is already running")]
    JobAlreadyRunning(Uuid),

    /// Pause/resume without a running job
    #[error("No active job")]
    NoActiveJob,

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Check if this error was caused by caller input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::InvalidRecord { .. } | Self::NoProxies
        )
    }
}
