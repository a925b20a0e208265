//! Job domain types
//!
//! A job is one batch run. The engine keeps a single "current job" slot and
//! exposes it to callers as a [`JobSnapshot`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::outcome::FailureBreakdown;

/// Lifecycle phase of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobPhase {
    Running,
    Paused,
    Completed,
    Cancelled,
    /// Workers drained but the results artifact could not be written
    Errored,
}

impl JobPhase {
    /// Running and paused jobs both hold the single active slot
    pub fn is_active(&self) -> bool {
        matches!(self, JobPhase::Running | JobPhase::Paused)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobPhase::Running => write!(f, "Running"),
            JobPhase::Paused => write!(f, "Paused"),
            JobPhase::Completed => write!(f, "Completed"),
            JobPhase::Cancelled => write!(f, "Cancelled"),
            JobPhase::Errored => write!(f, "Errored"),
        }
    }
}

/// Status of a single worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerStatus {
    Idle,
    /// Inside an attempt
    Running,
    /// Sleeping between attempts
    Waiting,
    Paused,
    Completed,
    Errored,
    Cancelled,
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerStatus::Idle => write!(f, "idle"),
            WorkerStatus::Running => write!(f, "running"),
            WorkerStatus::Waiting => write!(f, "waiting"),
            WorkerStatus::Paused => write!(f, "paused"),
            WorkerStatus::Completed => write!(f, "completed"),
            WorkerStatus::Errored => write!(f, "errored"),
            WorkerStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Progress of one worker as seen by status consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub worker_id: usize,
    pub proxy: String,
    pub assigned: usize,
    pub processed: u64,
    pub success: u64,
    pub failure: u64,
    pub status: WorkerStatus,
    /// Identifier of the record currently being attempted
    pub current: Option<String>,
}

impl WorkerSnapshot {
    pub fn new(worker_id: usize, proxy: impl Into<String>, assigned: usize) -> Self {
        Self {
            worker_id,
            proxy: proxy.into(),
            assigned,
            processed: 0,
            success: 0,
            failure: 0,
            status: WorkerStatus::Idle,
            current: None,
        }
    }

    /// Human readable status line, e.g. "processing alice@example.com"
    pub fn status_line(&self) -> String {
        match (&self.status, &self.current) {
            (WorkerStatus::Running, Some(identifier)) => format!("processing {}", identifier),
            (status, _) => status.to_string(),
        }
    }
}

/// Metrics derived from the raw counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// processed / total, in percent
    pub percent: f64,
    /// success / processed, in percent; 0 when nothing was processed
    pub success_rate: f64,
    /// Processed records per minute since the job started
    pub throughput_per_minute: f64,
    /// Remaining seconds at the current throughput; absent when throughput is zero
    pub eta_seconds: Option<u64>,
}

impl Progress {
    pub fn derive(total: u64, processed: u64, success: u64, elapsed_secs: f64) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            processed as f64 / total as f64 * 100.0
        };

        let success_rate = if processed == 0 {
            0.0
        } else {
            success as f64 / processed as f64 * 100.0
        };

        let per_second = if elapsed_secs > 0.0 {
            processed as f64 / elapsed_secs
        } else {
            0.0
        };

        let eta_seconds = if per_second > 0.0 {
            let remaining = total.saturating_sub(processed) as f64;
            Some((remaining / per_second).ceil() as u64)
        } else {
            None
        };

        Self {
            percent,
            success_rate,
            throughput_per_minute: per_second * 60.0,
            eta_seconds,
        }
    }
}

/// Consistent point-in-time view of the current job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: Option<Uuid>,
    pub phase: Option<JobPhase>,
    pub total: u64,
    pub processed: u64,
    pub success: u64,
    pub failure: u64,
    pub failure_breakdown: FailureBreakdown,
    /// Attempts that ended in a challenge (captcha/MFA)
    pub captcha_count: u64,
    /// Records never attempted because their worker stopped early
    pub skipped: u64,
    pub percent: f64,
    pub success_rate: f64,
    pub throughput_per_minute: f64,
    pub eta_seconds: Option<u64>,
    pub is_running: bool,
    pub is_paused: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub workers: Vec<WorkerSnapshot>,
}

impl JobSnapshot {
    /// Snapshot reported when no job has been submitted yet
    pub fn idle() -> Self {
        Self {
            job_id: None,
            phase: None,
            total: 0,
            processed: 0,
            success: 0,
            failure: 0,
            failure_breakdown: FailureBreakdown::default(),
            captcha_count: 0,
            skipped: 0,
            percent: 0.0,
            success_rate: 0.0,
            throughput_per_minute: 0.0,
            eta_seconds: None,
            is_running: false,
            is_paused: false,
            started_at: None,
            completed_at: None,
            workers: Vec::new(),
        }
    }
}
