//! Job
//!
//! One batch run: owns the shared state, launches one worker per proxy,
//! supervises them until every worker is terminal, then reconciles the
//! counters, writes the results artifact and sends the completion notice.

mod artifact;
mod partition;
mod state;
mod worker;

pub use artifact::ResultsWriter;
pub use partition::partition;

use chrono::Utc;
use drover_core::domain::job::{JobPhase, JobSnapshot, WorkerSnapshot, WorkerStatus};
use drover_core::domain::record::Record;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::control::{RunControl, RunState};
use crate::delay::DelayPolicy;
use crate::error::{EngineError, Result};
use crate::executor::AttemptExecutor;
use crate::input::validate_records;
use crate::notifier::{self, Notifier};
use crate::proxy::ProxyPool;

use self::state::JobState;
use self::worker::Worker;

/// Collaborators and settings a job runs with
#[derive(Clone)]
pub struct JobSettings {
    pub executor: Arc<dyn AttemptExecutor>,
    pub notifier: Arc<dyn Notifier>,
    pub results: ResultsWriter,
    pub delay: DelayPolicy,
    pub worker_stagger: Duration,
    pub progress_every: u64,
}

/// State shared by the job handle, its supervisor and its workers
pub(crate) struct JobShared {
    state: Mutex<JobState>,
    pub executor: Arc<dyn AttemptExecutor>,
    pub notifier: Arc<dyn Notifier>,
    pub delay: DelayPolicy,
    pub progress_every: u64,
}

impl JobShared {
    pub fn lock_state(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle to a started job
pub struct Job {
    id: Uuid,
    shared: Arc<JobShared>,
    control: RunControl,
    finished: watch::Receiver<bool>,
}

impl Job {
    /// Validates the input, partitions it and launches the workers
    ///
    /// Fails before anything is spawned when `pool` or `records` is empty.
    /// One worker is started per proxy, capped at the number of records;
    /// worker `i` is bound to the proxy the pool assigns to slot `i`.
    pub fn start(
        records: Vec<Record>,
        pool: &ProxyPool,
        settings: JobSettings,
    ) -> Result<Arc<Job>> {
        let pool_size = pool.len();
        if pool_size == 0 {
            return Err(EngineError::NoProxies);
        }
        validate_records(&records)?;

        let id = Uuid::new_v4();
        let total = records.len();
        let worker_count = pool_size.min(total);
        let ranges = partition(total, worker_count);
        let proxies = (0..worker_count)
            .map(|slot| pool.assign(slot))
            .collect::<Result<Vec<_>>>()?;

        let snapshots = ranges
            .iter()
            .zip(&proxies)
            .enumerate()
            .map(|(worker_id, (range, proxy))| {
                WorkerSnapshot::new(worker_id, proxy.endpoint.clone(), range.len())
            })
            .collect();

        let shared = Arc::new(JobShared {
            state: Mutex::new(JobState::new(id, total, snapshots)),
            executor: settings.executor,
            notifier: settings.notifier,
            delay: settings.delay,
            progress_every: settings.progress_every,
        });

        let control = RunControl::new();
        let (finished_tx, finished) = watch::channel(false);
        let records: Arc<[Record]> = records.into();

        let workers = ranges
            .into_iter()
            .zip(proxies)
            .enumerate()
            .map(|(worker_id, (range, proxy))| {
                Worker::new(
                    worker_id,
                    proxy,
                    Arc::clone(&records),
                    range,
                    Arc::clone(&shared),
                    control.checkpoint(),
                )
            })
            .collect();

        info!(
            "Starting job {} with {} record(s) across {} worker(s)",
            id, total, worker_count
        );

        tokio::spawn(supervise(
            id,
            workers,
            Arc::clone(&shared),
            control.clone(),
            settings.results,
            settings.worker_stagger,
            finished_tx,
        ));

        Ok(Arc::new(Job {
            id,
            shared,
            control,
            finished,
        }))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> JobPhase {
        self.shared.lock_state().phase
    }

    /// Running or paused
    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    /// Consistent view of all counters plus derived metrics
    pub fn snapshot(&self) -> JobSnapshot {
        self.shared.lock_state().snapshot(Utc::now())
    }

    /// Stops workers at their next checkpoint
    ///
    /// Pausing an already paused job is a no-op.
    pub fn pause(&self) -> Result<()> {
        let mut state = self.shared.lock_state();
        if state.phase.is_terminal() {
            return Err(EngineError::NoActiveJob);
        }

        if self.control.pause() {
            state.phase = JobPhase::Paused;
            info!("Job {} paused", self.id);
        }
        Ok(())
    }

    /// Lets paused workers continue; resuming a running job is a no-op
    pub fn resume(&self) -> Result<()> {
        let mut state = self.shared.lock_state();
        if state.phase.is_terminal() {
            return Err(EngineError::NoActiveJob);
        }

        if self.control.resume() {
            state.phase = JobPhase::Running;
            info!("Job {} resumed", self.id);
        }
        Ok(())
    }

    /// Requests cancellation; returns `false` if the job was already terminal
    /// or already cancelled
    pub fn cancel(&self) -> bool {
        let state = self.shared.lock_state();
        if !state.phase.is_active() {
            return false;
        }
        let cancelled = self.control.cancel();
        if cancelled {
            info!("Job {} cancellation requested", self.id);
        }
        cancelled
    }

    /// Path of the results artifact once it has been written
    pub fn results_path(&self) -> Option<PathBuf> {
        self.shared.lock_state().artifact.clone()
    }

    /// Resolves once the job is terminal
    pub async fn wait(&self) {
        let mut finished = self.finished.clone();
        // Sender dropped means the supervisor is gone, which also ends the wait
        let _ = finished.wait_for(|done| *done).await;
    }
}

/// Launches the workers, waits for all of them and finalises the job
async fn supervise(
    job_id: Uuid,
    workers: Vec<Worker>,
    shared: Arc<JobShared>,
    control: RunControl,
    results: ResultsWriter,
    stagger: Duration,
    finished: watch::Sender<bool>,
) {
    let mut handles: Vec<(usize, JoinHandle<WorkerStatus>)> = Vec::with_capacity(workers.len());
    let mut checkpoint = control.checkpoint();

    for (worker_id, worker) in workers.into_iter().enumerate() {
        if worker_id > 0 && !stagger.is_zero() && !checkpoint.sleep(stagger).await {
            // Workers never launched have nothing to report
            break;
        }
        handles.push((worker_id, tokio::spawn(worker.run())));
    }

    for (worker_id, handle) in handles {
        if let Err(e) = handle.await {
            error!("Worker {} of job {} crashed: {}", worker_id, job_id, e);
            let mut state = shared.lock_state();
            if let Some(worker) = state.workers.get_mut(worker_id) {
                worker.status = WorkerStatus::Errored;
                worker.current = None;
            }
        }
    }

    if control.state() == RunState::Cancelled {
        let (processed, total) = {
            let mut state = shared.lock_state();
            state.phase = JobPhase::Cancelled;
            state.completed_at = Some(Utc::now());
            (state.processed, state.total)
        };
        info!("Job {} cancelled after {}/{} record(s)", job_id, processed, total);
        notifier::dispatch(&shared.notifier, notifier::cancelled(job_id, processed, total));
    } else {
        let artifact = {
            let mut state = shared.lock_state();
            state.reconcile();
            state.completed_at = Some(Utc::now());
            state.artifact(JobPhase::Completed)
        };

        let written = results.write(&artifact).await;

        let mut state = shared.lock_state();
        match written {
            Ok(path) => {
                state.artifact = Some(path);
                state.phase = JobPhase::Completed;
            }
            Err(e) => {
                error!("Failed to write results for job {}: {}", job_id, e);
                state.phase = JobPhase::Errored;
            }
        }
        drop(state);

        if artifact.summary.skipped > 0 {
            warn!(
                "Job {} finished with {} record(s) never attempted",
                job_id, artifact.summary.skipped
            );
        }
        info!(
            "Job {} completed: {} success, {} failure",
            job_id, artifact.summary.success, artifact.summary.failure
        );
        notifier::dispatch(
            &shared.notifier,
            notifier::completion_summary(job_id, &artifact.summary),
        );
    }

    let _ = finished.send(true);
}
