//! Worker execution loop
//!
//! A worker owns one proxy and one contiguous slice of the job's records and
//! attempts them strictly in order, one at a time.

use chrono::Utc;
use drover_core::domain::job::{WorkerSnapshot, WorkerStatus};
use drover_core::domain::outcome::{AttemptOutcome, FailureKind};
use drover_core::domain::proxy::ProxyHandle;
use drover_core::domain::record::Record;
use drover_core::domain::results::RecordResult;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::JobShared;
use crate::control::{Checkpoint, RunState};
use crate::notifier;

pub(crate) struct Worker {
    id: usize,
    proxy: ProxyHandle,
    records: Arc<[Record]>,
    range: Range<usize>,
    shared: Arc<JobShared>,
    checkpoint: Checkpoint,
    /// Owned worker state; only copies of it are published to the job
    state: WorkerSnapshot,
}

impl Worker {
    pub fn new(
        id: usize,
        proxy: ProxyHandle,
        records: Arc<[Record]>,
        range: Range<usize>,
        shared: Arc<JobShared>,
        checkpoint: Checkpoint,
    ) -> Self {
        let state = WorkerSnapshot::new(id, proxy.endpoint.clone(), range.len());
        Self {
            id,
            proxy,
            records,
            range,
            shared,
            checkpoint,
            state,
        }
    }

    /// Drains the slice and returns the terminal status
    pub async fn run(mut self) -> WorkerStatus {
        info!(
            "Worker {} starting with {} record(s) via {}",
            self.id,
            self.range.len(),
            self.proxy.endpoint
        );

        let records = Arc::clone(&self.records);
        let last = self.range.end.saturating_sub(1);

        for idx in self.range.clone() {
            if self.checkpoint.state() == RunState::Paused {
                self.publish(WorkerStatus::Paused, None);
                debug!("Worker {} paused", self.id);
            }
            if !self.checkpoint.proceed().await {
                return self.finish(WorkerStatus::Cancelled);
            }

            let record = &records[idx];
            self.publish(WorkerStatus::Running, Some(record.identifier.clone()));

            let outcome = match self.shared.executor.attempt(record, &self.proxy).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        "Worker {} stopped: executor '{}' failed on {}: {:#}",
                        self.id,
                        self.shared.executor.name(),
                        record.identifier,
                        e
                    );
                    return self.finish(WorkerStatus::Errored);
                }
            };

            self.apply(record, outcome);

            if idx < last {
                let delay = self.shared.delay.sample(&mut rand::thread_rng());
                self.publish(WorkerStatus::Waiting, None);
                debug!("Worker {} waiting {:?}", self.id, delay);

                if !self.checkpoint.sleep(delay).await {
                    return self.finish(WorkerStatus::Cancelled);
                }
            }
        }

        self.finish(WorkerStatus::Completed)
    }

    /// Counts one outcome in the worker and job state under one lock
    fn apply(&mut self, record: &Record, outcome: AttemptOutcome) {
        self.state.processed += 1;
        if outcome.is_success() {
            self.state.success += 1;
        } else {
            self.state.failure += 1;
        }

        let result = RecordResult {
            identifier: record.identifier.clone(),
            worker_id: self.id,
            proxy: self.proxy.endpoint.clone(),
            outcome,
            attempted_at: Utc::now(),
        };

        let progress = {
            let mut state = self.shared.lock_state();
            let processed = state.record(result);
            state.publish_worker(self.state.clone());

            let every = self.shared.progress_every;
            (every > 0 && processed % every == 0).then(|| state.snapshot(Utc::now()))
        };

        debug!("Worker {}: {} -> {}", self.id, record.identifier, outcome);

        if outcome.failure_kind() == Some(FailureKind::ChallengeRequired) {
            warn!(
                "Challenge required for {} on worker {} via {}",
                record.identifier, self.id, self.proxy.endpoint
            );
            notifier::dispatch(
                &self.shared.notifier,
                notifier::challenge_alert(&record.identifier, &self.proxy.endpoint, self.id),
            );
        }

        if let Some(snapshot) = progress {
            notifier::dispatch(&self.shared.notifier, notifier::progress_update(&snapshot));
        }
    }

    fn publish(&mut self, status: WorkerStatus, current: Option<String>) {
        self.state.status = status;
        self.state.current = current;
        self.shared.lock_state().publish_worker(self.state.clone());
    }

    fn finish(mut self, status: WorkerStatus) -> WorkerStatus {
        self.publish(status, None);
        info!(
            "Worker {} {} after {}/{} record(s)",
            self.id,
            status,
            self.state.processed,
            self.range.len()
        );
        status
    }
}
