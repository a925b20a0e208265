//! Notification sinks
//!
//! Notifications are advisory. They are sent from background tasks and their
//! failures are logged and dropped; a job never waits on or fails because of
//! a notifier.

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use drover_core::domain::job::JobSnapshot;
use drover_core::domain::results::ResultsSummary;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;

/// External notification sink
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> anyhow::Result<()>;
}

/// Notifier that only writes to the log
///
/// Used when no external sink is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        info!(target: "drover_engine::notification", "{}", message);
        Ok(())
    }
}

/// Builds the notifier selected by the configuration
pub fn from_config(config: &EngineConfig) -> Arc<dyn Notifier> {
    match &config.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(
            telegram.bot_token.clone(),
            telegram.chat_id.clone(),
        )),
        None => Arc::new(LogNotifier),
    }
}

/// Sends `message` in the background, swallowing failures
pub fn dispatch(notifier: &Arc<dyn Notifier>, message: String) {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&message).await {
            warn!("Failed to send notification: {:#}", e);
        }
    });
}

// =============================================================================
// Messages
// =============================================================================

pub fn challenge_alert(identifier: &str, proxy: &str, worker_id: usize) -> String {
    format!(
        "🚨 <b>CHALLENGE DETECTED</b>\n\
         Account: {}\n\
         Worker: {}\n\
         Proxy: {}\n\
         Action required: resolve the challenge manually",
        identifier, worker_id, proxy
    )
}

pub fn progress_update(snapshot: &JobSnapshot) -> String {
    format!(
        "📊 <b>Batch progress</b>\n\
         Processed: {}/{} ({:.1}%)\n\
         Success: {} | Failed: {}\n\
         Success rate: {:.1}%",
        snapshot.processed,
        snapshot.total,
        snapshot.percent,
        snapshot.success,
        snapshot.failure,
        snapshot.success_rate
    )
}

pub fn completion_summary(job_id: Uuid, summary: &ResultsSummary) -> String {
    format!(
        "✅ <b>Batch {} completed</b>\n\
         Processed: {}/{}\n\
         Success: {} | Failed: {} | Challenges: {}\n\
         Success rate: {:.1}%",
        job_id,
        summary.processed,
        summary.total,
        summary.success,
        summary.failure,
        summary.captcha_count,
        summary.success_rate
    )
}

/// Sent when a sink is set up, so the operator can see alerts arrive
pub fn configured(sink: &str) -> String {
    format!(
        "🔔 <b>Drover notifications configured</b>\n\
         Sink: {}\n\
         Challenge, progress and completion alerts will be sent here.",
        sink
    )
}

pub fn cancelled(job_id: Uuid, processed: u64, total: u64) -> String {
    format!(
        "⏹ <b>Batch {} cancelled</b>\nProcessed: {}/{}",
        job_id, processed, total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    struct FailingNotifier {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _message: &str) -> anyhow::Result<()> {
            *self.calls.lock().unwrap() += 1;
            anyhow::bail!("sink unavailable")
        }
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failures() {
        let failing = Arc::new(FailingNotifier {
            calls: Mutex::new(0),
        });
        let notifier: Arc<dyn Notifier> = failing.clone();

        dispatch(&notifier, "hello".to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(*failing.calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_challenge_alert_mentions_account_worker_and_proxy() {
        let message = challenge_alert("alice@example.com", "http://10.0.0.1:3128", 3);
        assert!(message.contains("alice@example.com"));
        assert!(message.contains("Worker: 3"));
        assert!(message.contains("http://10.0.0.1:3128"));
    }

    #[test]
    fn test_progress_update_formats_percentages() {
        let mut snapshot = JobSnapshot::idle();
        snapshot.total = 8;
        snapshot.processed = 2;
        snapshot.success = 1;
        snapshot.failure = 1;
        snapshot.percent = 25.0;
        snapshot.success_rate = 50.0;

        let message = progress_update(&snapshot);
        assert!(message.contains("2/8 (25.0%)"));
        assert!(message.contains("Success rate: 50.0%"));
    }

    #[test]
    fn test_configured_names_the_sink() {
        let message = configured("telegram");
        assert!(message.contains("configured"));
        assert!(message.contains("Sink: telegram"));
    }

    #[test]
    fn test_from_config_defaults_to_log_notifier() {
        let config = EngineConfig::default();
        // Only checks that construction works without Telegram settings
        let _notifier = from_config(&config);
    }
}
