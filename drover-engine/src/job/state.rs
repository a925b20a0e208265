//! Shared job state
//!
//! Mutated by every worker of a job under a single mutex. Every mutation
//! keeps `processed == success + failures.total()` and `processed <= total`.

use chrono::{DateTime, Utc};
use drover_core::domain::job::{JobPhase, JobSnapshot, Progress, WorkerSnapshot};
use drover_core::domain::outcome::{AttemptOutcome, FailureBreakdown, FailureKind};
use drover_core::domain::results::{RecordResult, ResultsArtifact, ResultsSummary};
use std::path::PathBuf;
use uuid::Uuid;

pub(crate) struct JobState {
    pub job_id: Uuid,
    pub phase: JobPhase,
    pub total: u64,
    pub processed: u64,
    pub success: u64,
    pub failures: FailureBreakdown,
    pub captcha_count: u64,
    pub skipped: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub workers: Vec<WorkerSnapshot>,
    pub results: Vec<RecordResult>,
    pub artifact: Option<PathBuf>,
}

impl JobState {
    pub fn new(job_id: Uuid, total: usize, workers: Vec<WorkerSnapshot>) -> Self {
        Self {
            job_id,
            phase: JobPhase::Running,
            total: total as u64,
            processed: 0,
            success: 0,
            failures: FailureBreakdown::default(),
            captcha_count: 0,
            skipped: 0,
            started_at: Utc::now(),
            completed_at: None,
            workers,
            results: Vec::with_capacity(total),
            artifact: None,
        }
    }

    /// Counts one attempt and returns the new processed count
    pub fn record(&mut self, result: RecordResult) -> u64 {
        match result.outcome {
            AttemptOutcome::Success => self.success += 1,
            AttemptOutcome::Failure(kind) => {
                self.failures.record(kind);
                if kind == FailureKind::ChallengeRequired {
                    self.captcha_count += 1;
                }
            }
        }
        self.processed += 1;
        self.results.push(result);
        self.processed
    }

    /// Replaces the published view of one worker
    pub fn publish_worker(&mut self, worker: WorkerSnapshot) {
        if let Some(slot) = self.workers.get_mut(worker.worker_id) {
            *slot = worker;
        }
    }

    /// Counts records no worker got to as unknown failures
    ///
    /// After this call `processed == total`.
    pub fn reconcile(&mut self) {
        let missing = self.total.saturating_sub(self.processed);
        if missing > 0 {
            self.failures.add(FailureKind::Unknown, missing);
            self.skipped += missing;
            self.processed = self.total;
        }
    }

    pub fn failure(&self) -> u64 {
        self.failures.total()
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> JobSnapshot {
        let end = self.completed_at.unwrap_or(now);
        let elapsed = (end - self.started_at).num_milliseconds().max(0) as f64 / 1000.0;
        let progress = Progress::derive(self.total, self.processed, self.success, elapsed);

        JobSnapshot {
            job_id: Some(self.job_id),
            phase: Some(self.phase),
            total: self.total,
            processed: self.processed,
            success: self.success,
            failure: self.failure(),
            failure_breakdown: self.failures,
            captcha_count: self.captcha_count,
            skipped: self.skipped,
            percent: progress.percent,
            success_rate: progress.success_rate,
            throughput_per_minute: progress.throughput_per_minute,
            eta_seconds: progress.eta_seconds,
            is_running: self.phase.is_active(),
            is_paused: self.phase == JobPhase::Paused,
            started_at: Some(self.started_at),
            completed_at: self.completed_at,
            workers: self.workers.clone(),
        }
    }

    pub fn summary(&self) -> ResultsSummary {
        let success_rate = if self.processed == 0 {
            0.0
        } else {
            self.success as f64 / self.processed as f64 * 100.0
        };

        ResultsSummary {
            total: self.total,
            processed: self.processed,
            success: self.success,
            failure: self.failure(),
            failure_breakdown: self.failures,
            captcha_count: self.captcha_count,
            skipped: self.skipped,
            success_rate,
        }
    }

    pub fn artifact(&self, phase: JobPhase) -> ResultsArtifact {
        ResultsArtifact {
            job_id: self.job_id,
            phase,
            started_at: self.started_at,
            completed_at: self.completed_at.unwrap_or_else(Utc::now),
            summary: self.summary(),
            records: self.results.clone(),
        }
    }
}
