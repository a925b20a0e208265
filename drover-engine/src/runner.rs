//! Job runner
//!
//! Top-level façade of the engine. Holds the proxy pool, the executor and the
//! notifier, and a single "current job" slot: at most one job is running or
//! paused at any time. The runner is constructed explicitly and shared by
//! reference with whatever presents it (HTTP server, tests).

use anyhow::Context;
use drover_core::domain::job::JobSnapshot;
use drover_core::domain::record::Record;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::delay::DelayPolicy;
use crate::error::{EngineError, Result};
use crate::executor::AttemptExecutor;
use crate::input;
use crate::job::{Job, JobSettings, ResultsWriter};
use crate::notifier::{self, Notifier};
use crate::proxy::ProxyPool;

/// What a [`JobRunner::reset`] cleared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Job that was still active and got cancelled
    pub cancelled_job: Option<Uuid>,
    /// Number of spooled input files removed
    pub removed_uploads: usize,
}

pub struct JobRunner {
    config: EngineConfig,
    proxies: ProxyPool,
    executor: Arc<dyn AttemptExecutor>,
    notifier: Arc<dyn Notifier>,
    results: ResultsWriter,
    current: Mutex<Option<Arc<Job>>>,
}

impl JobRunner {
    pub fn new(
        config: EngineConfig,
        executor: Arc<dyn AttemptExecutor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            proxies: ProxyPool::new(config.proxies_file()),
            results: ResultsWriter::new(config.results_dir()),
            config,
            executor,
            notifier,
            current: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn proxies(&self) -> &ProxyPool {
        &self.proxies
    }

    /// Starts a new job for `records`
    ///
    /// Fails with [`EngineError::JobAlreadyRunning`] while another job is
    /// running or paused; the active job is left untouched.
    pub fn submit(&self, records: Vec<Record>) -> Result<Uuid> {
        let mut current = self.lock_current();

        if let Some(job) = current.as_ref() {
            if job.is_active() {
                warn!("Rejecting submission: job {} is still active", job.id());
                return Err(EngineError::JobAlreadyRunning(job.id()));
            }
        }

        input::validate_records(&records)?;

        if self.proxies.is_empty() {
            return Err(EngineError::NoProxies);
        }

        let job = Job::start(records, &self.proxies, self.job_settings())?;
        let job_id = job.id();
        *current = Some(job);

        info!("Job {} submitted", job_id);
        Ok(job_id)
    }

    /// Spools an uploaded batch, parses it and submits the records
    pub fn submit_upload(&self, text: &str) -> Result<Uuid> {
        let spooled = input::spool_upload(&self.config.uploads_dir(), text)?;
        let records = input::parse_records(text)?;
        let job_id = self.submit(records)?;

        // Rejected uploads stay spooled until the next reset
        if let Err(e) = std::fs::remove_file(&spooled) {
            warn!("Failed to remove spooled upload {}: {}", spooled.display(), e);
        }
        Ok(job_id)
    }

    /// Snapshot of the current job, or an idle snapshot when there is none
    pub fn status(&self) -> JobSnapshot {
        match self.current_job() {
            Some(job) => job.snapshot(),
            None => JobSnapshot::idle(),
        }
    }

    pub fn pause(&self) -> Result<()> {
        self.current_job().ok_or(EngineError::NoActiveJob)?.pause()
    }

    pub fn resume(&self) -> Result<()> {
        self.current_job().ok_or(EngineError::NoActiveJob)?.resume()
    }

    /// Name of the configured notification sink
    pub fn notifier_sink(&self) -> &'static str {
        if self.config.telegram.is_some() {
            "telegram"
        } else {
            "log"
        }
    }

    /// Sends a "configured" message straight through the notifier
    ///
    /// Unlike job notifications this waits for delivery and reports failure,
    /// so operators can verify their sink settings.
    pub async fn test_notification(&self) -> anyhow::Result<()> {
        let sink = self.notifier_sink();
        self.notifier
            .notify(&notifier::configured(sink))
            .await
            .with_context(|| format!("Failed to deliver test notification via {}", sink))?;
        info!("Test notification delivered via {}", sink);
        Ok(())
    }

    /// Identifier of the job in the current slot
    pub fn current_job_id(&self) -> Option<Uuid> {
        self.current_job().map(|job| job.id())
    }

    /// Results artifact of the current job, if it has been written
    pub fn results_location(&self) -> Option<PathBuf> {
        self.current_job()
            .and_then(|job| job.results_path())
            .filter(|path| path.exists())
    }

    /// Force-clears all in-memory job state
    ///
    /// Cancels the active job if any, empties the current job slot and
    /// removes spooled uploads. Only meant for recovering a wedged runner.
    pub fn reset(&self) -> ResetReport {
        let previous = self.lock_current().take();

        let cancelled_job = previous
            .filter(|job| job.cancel())
            .map(|job| job.id());

        let removed_uploads = input::clear_uploads(&self.config.uploads_dir());

        warn!(
            "Runner reset (cancelled job: {:?}, removed uploads: {})",
            cancelled_job, removed_uploads
        );

        ResetReport {
            cancelled_job,
            removed_uploads,
        }
    }

    /// Resolves once the current job is terminal; returns immediately without one
    pub async fn wait(&self) {
        if let Some(job) = self.current_job() {
            job.wait().await;
        }
    }

    fn current_job(&self) -> Option<Arc<Job>> {
        self.lock_current().clone()
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Arc<Job>>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn job_settings(&self) -> JobSettings {
        JobSettings {
            executor: Arc::clone(&self.executor),
            notifier: Arc::clone(&self.notifier),
            results: self.results.clone(),
            delay: DelayPolicy::new(self.config.attempt_delay, self.config.attempt_jitter),
            worker_stagger: self.config.worker_stagger,
            progress_every: self.config.progress_every,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SimulatedExecutor;
    use async_trait::async_trait;
    use drover_core::domain::job::{JobPhase, WorkerStatus};
    use drover_core::domain::outcome::{AttemptOutcome, FailureKind};
    use drover_core::domain::proxy::ProxyHandle;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // =========================================================================
    // Test doubles
    // =========================================================================

    /// Alternates Success / InvalidCredentials across all calls
    #[derive(Default)]
    struct AlternatingExecutor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AttemptExecutor for AlternatingExecutor {
        fn name(&self) -> &str {
            "alternating"
        }

        async fn attempt(&self, _: &Record, _: &ProxyHandle) -> anyhow::Result<AttemptOutcome> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if call % 2 == 0 {
                AttemptOutcome::Success
            } else {
                AttemptOutcome::Failure(FailureKind::InvalidCredentials)
            })
        }
    }

    /// Always reports a challenge
    struct ChallengeExecutor;

    #[async_trait]
    impl AttemptExecutor for ChallengeExecutor {
        fn name(&self) -> &str {
            "challenge"
        }

        async fn attempt(&self, _: &Record, _: &ProxyHandle) -> anyhow::Result<AttemptOutcome> {
            Ok(AttemptOutcome::Failure(FailureKind::ChallengeRequired))
        }
    }

    /// Breaks on one identifier, either with an error or a panic
    struct BrokenExecutor {
        poison: &'static str,
        panic: bool,
    }

    #[async_trait]
    impl AttemptExecutor for BrokenExecutor {
        fn name(&self) -> &str {
            "broken"
        }

        async fn attempt(&self, record: &Record, _: &ProxyHandle) -> anyhow::Result<AttemptOutcome> {
            if record.identifier == self.poison {
                if self.panic {
                    panic!("executor bug");
                }
                anyhow::bail!("executor bug");
            }
            Ok(AttemptOutcome::Success)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> anyhow::Result<()> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(format!("r{}", i), format!("secret{}", i)))
            .collect()
    }

    fn proxies(n: usize) -> String {
        (0..n)
            .map(|i| format!("http://10.0.0.{}:3128", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn build_runner(
        config: EngineConfig,
        executor: Arc<dyn AttemptExecutor>,
        proxy_count: usize,
    ) -> (JobRunner, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let runner = JobRunner::new(config, executor, notifier.clone());
        if proxy_count > 0 {
            runner.proxies().load(&proxies(proxy_count)).unwrap();
        }
        (runner, notifier)
    }

    fn immediate_runner(
        dir: &tempfile::TempDir,
        executor: Arc<dyn AttemptExecutor>,
        proxy_count: usize,
    ) -> (JobRunner, Arc<RecordingNotifier>) {
        build_runner(EngineConfig::immediate(dir.path()), executor, proxy_count)
    }

    /// Config with short but real delays, for pause/concurrency tests
    fn paced_config(dir: &tempfile::TempDir) -> EngineConfig {
        EngineConfig {
            attempt_delay: Duration::from_millis(20),
            attempt_jitter: Duration::from_millis(5),
            ..EngineConfig::immediate(dir.path())
        }
    }

    fn always_success() -> Arc<dyn AttemptExecutor> {
        Arc::new(SimulatedExecutor::new(Duration::ZERO, 1.0))
    }

    async fn wait_done(runner: &JobRunner) {
        tokio::time::timeout(Duration::from_secs(10), runner.wait())
            .await
            .expect("job did not finish in time");
    }

    fn assert_counters(snapshot: &JobSnapshot) {
        assert_eq!(
            snapshot.processed,
            snapshot.success + snapshot.failure_breakdown.total()
        );
        assert_eq!(snapshot.failure, snapshot.failure_breakdown.total());
        assert!(snapshot.processed <= snapshot.total);
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[tokio::test]
    async fn test_ten_records_two_proxies_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 2);

        let job_id = runner.submit(records(10)).unwrap();
        wait_done(&runner).await;

        let status = runner.status();
        assert_eq!(status.job_id, Some(job_id));
        assert_eq!(status.phase, Some(JobPhase::Completed));
        assert_eq!(status.total, 10);
        assert_eq!(status.processed, 10);
        assert_eq!(status.success, 10);
        assert_eq!(status.failure, 0);
        assert_eq!(status.percent, 100.0);
        assert_eq!(status.success_rate, 100.0);
        assert!(!status.is_running);
        assert!(status.completed_at.is_some());

        assert_eq!(status.workers.len(), 2);
        for worker in &status.workers {
            assert_eq!(worker.assigned, 5);
            assert_eq!(worker.processed, 5);
            assert_eq!(worker.status, WorkerStatus::Completed);
        }
    }

    #[tokio::test]
    async fn test_results_artifact_is_written_on_completion() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, notifier) = immediate_runner(&dir, always_success(), 3);

        let job_id = runner.submit(records(7)).unwrap();
        wait_done(&runner).await;

        let path = runner.results_location().expect("artifact should exist");
        assert!(path.ends_with(format!("job_{}.json", job_id)));

        let artifact: drover_core::domain::results::ResultsArtifact =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(artifact.job_id, job_id);
        assert_eq!(artifact.summary.total, 7);
        assert_eq!(artifact.summary.success, 7);
        assert_eq!(artifact.records.len(), 7);

        // Secrets never end up in the artifact
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret0"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let messages = notifier.messages.lock().unwrap();
        assert!(messages.iter().any(|m| m.contains("completed")));
    }

    #[tokio::test]
    async fn test_submit_without_proxies_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 0);

        let err = runner.submit(records(3)).unwrap_err();
        assert!(matches!(err, EngineError::NoProxies));

        let status = runner.status();
        assert!(status.job_id.is_none());
        assert!(!status.is_running);
        assert!(runner.results_location().is_none());
    }

    #[tokio::test]
    async fn test_submit_empty_batch_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 2);

        assert!(matches!(runner.submit(vec![]), Err(EngineError::EmptyInput)));
        assert!(runner.status().job_id.is_none());
    }

    #[tokio::test]
    async fn test_alternating_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, Arc::new(AlternatingExecutor::default()), 3);

        runner.submit(records(7)).unwrap();
        wait_done(&runner).await;

        let status = runner.status();
        assert_eq!(status.processed, 7);
        assert_eq!(status.success, 4);
        assert_eq!(
            status.failure_breakdown.get(FailureKind::InvalidCredentials),
            3
        );
        assert_counters(&status);
    }

    #[tokio::test]
    async fn test_submit_while_running_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let slow = Arc::new(SimulatedExecutor::new(Duration::from_millis(50), 1.0));
        let (runner, _) = build_runner(paced_config(&dir), slow, 2);

        let job_id = runner.submit(records(20)).unwrap();
        let before = runner.status();
        assert!(before.is_running);

        let err = runner.submit(records(3)).unwrap_err();
        assert!(matches!(err, EngineError::JobAlreadyRunning(id) if id == job_id));

        let after = runner.status();
        assert_eq!(after.job_id, Some(job_id));
        assert_eq!(after.total, 20);

        runner.reset();
    }

    #[tokio::test]
    async fn test_submit_while_paused_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let slow = Arc::new(SimulatedExecutor::new(Duration::from_millis(20), 1.0));
        let (runner, _) = build_runner(paced_config(&dir), slow, 2);

        let job_id = runner.submit(records(20)).unwrap();
        runner.pause().unwrap();
        // Let in-flight attempts land
        tokio::time::sleep(Duration::from_millis(100)).await;

        let err = runner.submit(records(3)).unwrap_err();
        assert!(matches!(err, EngineError::JobAlreadyRunning(id) if id == job_id));

        let before = runner.status();
        assert_eq!(before.phase, Some(JobPhase::Paused));
        tokio::time::sleep(Duration::from_secs(1)).await;
        let after = runner.status();
        assert_eq!(before.processed, after.processed);
        assert_eq!(after.job_id, Some(job_id));

        runner.resume().unwrap();
        wait_done(&runner).await;
        assert_eq!(runner.status().processed, 20);
    }

    #[tokio::test]
    async fn test_pause_holds_progress_until_resume() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(SimulatedExecutor::new(Duration::from_millis(5), 1.0));
        let (runner, _) = build_runner(paced_config(&dir), executor, 2);

        runner.submit(records(30)).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        runner.pause().unwrap();
        runner.pause().unwrap();
        // Let in-flight attempts land
        tokio::time::sleep(Duration::from_millis(100)).await;

        let first = runner.status();
        assert!(first.is_paused);
        assert!(first.is_running);
        assert_eq!(first.phase, Some(JobPhase::Paused));
        assert!(first.processed < 30);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let second = runner.status();
        assert_eq!(first.processed, second.processed);
        assert!(
            second
                .workers
                .iter()
                .all(|w| w.status == WorkerStatus::Paused || w.status == WorkerStatus::Waiting)
        );

        runner.resume().unwrap();
        runner.resume().unwrap();
        assert!(!runner.status().is_paused);

        wait_done(&runner).await;
        let done = runner.status();
        assert_eq!(done.processed, 30);
        assert_eq!(done.success, 30);
        assert_eq!(done.skipped, 0);
    }

    #[tokio::test]
    async fn test_counters_stay_consistent_during_run() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(SimulatedExecutor::new(Duration::from_millis(2), 0.5));
        let config = EngineConfig {
            attempt_delay: Duration::from_millis(3),
            attempt_jitter: Duration::from_millis(2),
            ..EngineConfig::immediate(dir.path())
        };
        let (runner, _) = build_runner(config, executor, 4);

        runner.submit(records(40)).unwrap();

        let mut last_processed = 0;
        while runner.status().is_running {
            let snapshot = runner.status();
            assert_counters(&snapshot);
            assert!(snapshot.processed >= last_processed);
            last_processed = snapshot.processed;
            tokio::time::sleep(Duration::from_millis(3)).await;
        }

        wait_done(&runner).await;
        let done = runner.status();
        assert_counters(&done);
        assert_eq!(done.processed, 40);
    }

    #[tokio::test]
    async fn test_executor_error_stops_only_its_worker() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(BrokenExecutor {
            poison: "r1",
            panic: false,
        });
        let (runner, _) = immediate_runner(&dir, executor, 2);

        runner.submit(records(6)).unwrap();
        wait_done(&runner).await;

        let status = runner.status();
        assert_eq!(status.phase, Some(JobPhase::Completed));
        assert_eq!(status.workers[0].status, WorkerStatus::Errored);
        assert_eq!(status.workers[0].processed, 1);
        assert_eq!(status.workers[1].status, WorkerStatus::Completed);

        // r1 and r2 were never counted by their worker
        assert_eq!(status.processed, 6);
        assert_eq!(status.success, 4);
        assert_eq!(status.skipped, 2);
        assert_eq!(status.failure_breakdown.get(FailureKind::Unknown), 2);
        assert_eq!(status.percent, 100.0);
        assert_counters(&status);
    }

    #[tokio::test]
    async fn test_worker_panic_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(BrokenExecutor {
            poison: "r0",
            panic: true,
        });
        let (runner, _) = immediate_runner(&dir, executor, 2);

        runner.submit(records(4)).unwrap();
        wait_done(&runner).await;

        let status = runner.status();
        assert_eq!(status.phase, Some(JobPhase::Completed));
        assert_eq!(status.workers[0].status, WorkerStatus::Errored);
        assert_eq!(status.workers[1].status, WorkerStatus::Completed);
        assert_eq!(status.success, 2);
        assert_eq!(status.skipped, 2);
        assert!(runner.results_location().is_some());
    }

    #[tokio::test]
    async fn test_challenges_are_counted_and_alerted() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, notifier) = immediate_runner(&dir, Arc::new(ChallengeExecutor), 2);

        runner.submit(records(4)).unwrap();
        wait_done(&runner).await;

        let status = runner.status();
        assert_eq!(status.captcha_count, 4);
        assert_eq!(
            status.failure_breakdown.get(FailureKind::ChallengeRequired),
            4
        );
        assert_eq!(status.success_rate, 0.0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let messages = notifier.messages.lock().unwrap();
        let alerts = messages
            .iter()
            .filter(|m| m.contains("CHALLENGE DETECTED"))
            .count();
        assert_eq!(alerts, 4);
        assert!(messages.iter().any(|m| m.contains("Account: r3")));
    }

    #[tokio::test]
    async fn test_progress_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            progress_every: 2,
            ..EngineConfig::immediate(dir.path())
        };
        let (runner, notifier) = build_runner(config, always_success(), 1);

        runner.submit(records(6)).unwrap();
        wait_done(&runner).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let messages = notifier.messages.lock().unwrap();
        let updates = messages.iter().filter(|m| m.contains("Batch progress")).count();
        assert_eq!(updates, 3);
    }

    #[tokio::test]
    async fn test_pause_and_resume_without_job() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 1);

        assert!(matches!(runner.pause(), Err(EngineError::NoActiveJob)));
        assert!(matches!(runner.resume(), Err(EngineError::NoActiveJob)));

        runner.submit(records(2)).unwrap();
        wait_done(&runner).await;
        assert!(matches!(runner.pause(), Err(EngineError::NoActiveJob)));
    }

    #[tokio::test]
    async fn test_new_job_after_completion_supersedes_previous() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 2);

        let first = runner.submit(records(2)).unwrap();
        wait_done(&runner).await;
        let first_path = runner.results_location().unwrap();

        let second = runner.submit(records(3)).unwrap();
        assert_ne!(first, second);
        wait_done(&runner).await;

        assert_eq!(runner.status().total, 3);
        let second_path = runner.results_location().unwrap();
        assert_ne!(first_path, second_path);
        // Previous artifacts are left on disk
        assert!(first_path.exists());
    }

    #[tokio::test]
    async fn test_reset_cancels_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let slow = Arc::new(SimulatedExecutor::new(Duration::from_millis(20), 1.0));
        let (runner, _) = build_runner(paced_config(&dir), slow, 2);

        assert!(runner.submit_upload("not a batch").is_err());

        let job_id = runner.submit(records(50)).unwrap();
        runner.pause().unwrap();

        let report = runner.reset();
        assert_eq!(report.cancelled_job, Some(job_id));
        assert_eq!(report.removed_uploads, 1);

        let status = runner.status();
        assert!(status.job_id.is_none());
        assert!(!status.is_running);
        assert!(!status.is_paused);

        // Runner is usable again right away
        runner.submit(records(2)).unwrap();
        wait_done(&runner).await;
        assert_eq!(runner.status().processed, 2);
    }

    #[tokio::test]
    async fn test_reset_without_job_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 1);

        assert_eq!(runner.reset(), ResetReport::default());
    }

    #[tokio::test]
    async fn test_submit_upload_runs_parsed_records() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 2);

        runner
            .submit_upload("email,password\na@example.com,x\nb@example.com,y\n")
            .unwrap();
        wait_done(&runner).await;

        let status = runner.status();
        assert_eq!(status.total, 2);
        assert_eq!(status.success, 2);
        assert_eq!(input::clear_uploads(&runner.config().uploads_dir()), 0);
    }

    #[tokio::test]
    async fn test_test_notification_is_delivered_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, notifier) = immediate_runner(&dir, always_success(), 0);

        assert_eq!(runner.notifier_sink(), "log");
        runner.test_notification().await.unwrap();

        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Sink: log"));
    }

    #[tokio::test]
    async fn test_test_notification_surfaces_sink_failure() {
        struct DownNotifier;

        #[async_trait]
        impl Notifier for DownNotifier {
            async fn notify(&self, _: &str) -> anyhow::Result<()> {
                anyhow::bail!("chat not found")
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let runner = JobRunner::new(
            EngineConfig::immediate(dir.path()),
            always_success(),
            Arc::new(DownNotifier),
        );

        let err = runner.test_notification().await.unwrap_err();
        assert!(format!("{:#}", err).contains("chat not found"));
    }

    #[tokio::test]
    async fn test_more_proxies_than_records() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = immediate_runner(&dir, always_success(), 5);

        runner.submit(records(3)).unwrap();
        wait_done(&runner).await;

        let status = runner.status();
        assert_eq!(status.workers.len(), 3);
        assert!(status.workers.iter().all(|w| w.assigned == 1));
        assert_eq!(status.processed, 3);
    }
}
