//! Engine configuration
//!
//! Defines all tunable parameters of the batch engine: where durable files
//! live, the inter-attempt delay window, worker launch staggering, attempt
//! timeouts and notification settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine configuration
///
/// All delays are configurable so tests and local runs can use short
/// windows while production keeps the slow default pace.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root directory for the proxy list, uploaded inputs and results
    pub data_dir: PathBuf,

    /// Nominal delay between two attempts of the same worker
    pub attempt_delay: Duration,

    /// Maximum deviation from `attempt_delay` in either direction
    pub attempt_jitter: Duration,

    /// Delay between two consecutive worker launches
    pub worker_stagger: Duration,

    /// Upper bound for a single attempt
    pub attempt_timeout: Duration,

    /// Send a progress notification every N processed records (0 disables)
    pub progress_every: u64,

    /// Telegram notification settings, if configured
    pub telegram: Option<TelegramConfig>,
}

/// Credentials for the Telegram notification sink
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl EngineConfig {
    /// Creates a new configuration with defaults rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            attempt_delay: Duration::from_secs(180),
            attempt_jitter: Duration::from_secs(30),
            worker_stagger: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(30),
            progress_every: 25,
            telegram: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognised environment variables (all optional):
    /// - DROVER_DATA_DIR (default: ./data)
    /// - DROVER_ATTEMPT_DELAY_SECS (default: 180)
    /// - DROVER_ATTEMPT_JITTER_SECS (default: 30)
    /// - DROVER_WORKER_STAGGER_SECS (default: 2)
    /// - DROVER_ATTEMPT_TIMEOUT_SECS (default: 30)
    /// - DROVER_PROGRESS_EVERY (default: 25)
    /// - DROVER_TELEGRAM_BOT_TOKEN / DROVER_TELEGRAM_CHAT_ID
    pub fn from_env() -> Self {
        let data_dir = std::env::var("DROVER_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        let defaults = Self::new(data_dir);

        let telegram = match (
            std::env::var("DROVER_TELEGRAM_BOT_TOKEN"),
            std::env::var("DROVER_TELEGRAM_CHAT_ID"),
        ) {
            (Ok(bot_token), Ok(chat_id)) if !bot_token.is_empty() && !chat_id.is_empty() => {
                Some(TelegramConfig { bot_token, chat_id })
            }
            _ => None,
        };

        Self {
            attempt_delay: secs_from_env("DROVER_ATTEMPT_DELAY_SECS")
                .unwrap_or(defaults.attempt_delay),
            attempt_jitter: secs_from_env("DROVER_ATTEMPT_JITTER_SECS")
                .unwrap_or(defaults.attempt_jitter),
            worker_stagger: secs_from_env("DROVER_WORKER_STAGGER_SECS")
                .unwrap_or(defaults.worker_stagger),
            attempt_timeout: secs_from_env("DROVER_ATTEMPT_TIMEOUT_SECS")
                .unwrap_or(defaults.attempt_timeout),
            progress_every: std::env::var("DROVER_PROGRESS_EVERY")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(defaults.progress_every),
            telegram,
            ..defaults
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            anyhow::bail!("data_dir cannot be empty");
        }

        if self.attempt_jitter > self.attempt_delay {
            anyhow::bail!("attempt_jitter cannot exceed attempt_delay");
        }

        if self.attempt_timeout.is_zero() {
            anyhow::bail!("attempt_timeout must be greater than 0");
        }

        Ok(())
    }

    /// File holding the last uploaded proxy list
    pub fn proxies_file(&self) -> PathBuf {
        self.data_dir.join("current_proxies.txt")
    }

    /// Directory where uploaded batch inputs are spooled
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Directory holding one results artifact per job
    pub fn results_dir(&self) -> PathBuf {
        self.data_dir.join("results")
    }

    /// Zero-delay configuration for tests and dry runs
    pub fn immediate(data_dir: &Path) -> Self {
        Self {
            attempt_delay: Duration::ZERO,
            attempt_jitter: Duration::ZERO,
            worker_stagger: Duration::ZERO,
            ..Self::new(data_dir)
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("./data")
    }
}

fn secs_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
