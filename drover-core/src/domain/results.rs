//! Results artifact domain types
//!
//! Written once when a job completes; superseded by the next job's artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::JobPhase;
use crate::domain::outcome::{AttemptOutcome, FailureBreakdown};

/// Outcome of one record, without its secret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub identifier: String,
    pub worker_id: usize,
    pub proxy: String,
    pub outcome: AttemptOutcome,
    pub attempted_at: DateTime<Utc>,
}

/// Summary counters of a finished job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total: u64,
    pub processed: u64,
    pub success: u64,
    pub failure: u64,
    pub failure_breakdown: FailureBreakdown,
    pub captcha_count: u64,
    pub skipped: u64,
    pub success_rate: f64,
}

/// The exported results of one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsArtifact {
    pub job_id: Uuid,
    pub phase: JobPhase,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub summary: ResultsSummary,
    pub records: Vec<RecordResult>,
}
