//! Server configuration
//!
//! Wraps the engine configuration with the HTTP bind address and the choice
//! of attempt executor.

use drover_engine::EngineConfig;
use std::time::Duration;

/// Attempt strategies the server knows how to build
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorKind {
    Simulated { latency: Duration, success_ratio: f64 },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP surface listens on
    pub bind_addr: String,

    pub executor: ExecutorKind,

    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - DROVER_BIND_ADDR (default: 0.0.0.0:8080)
    /// - DROVER_EXECUTOR (default: simulated)
    /// - DROVER_SIM_LATENCY_MS (default: 2000)
    /// - DROVER_SIM_SUCCESS_RATIO (default: 1.0)
    /// - every variable read by [`EngineConfig::from_env`]
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("DROVER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let executor = match std::env::var("DROVER_EXECUTOR")
            .unwrap_or_else(|_| "simulated".to_string())
            .as_str()
        {
            "simulated" => ExecutorKind::Simulated {
                latency: std::env::var("DROVER_SIM_LATENCY_MS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_millis)
                    .unwrap_or(Duration::from_secs(2)),
                success_ratio: std::env::var("DROVER_SIM_SUCCESS_RATIO")
                    .ok()
                    .and_then(|s| s.parse::<f64>().ok())
                    .unwrap_or(1.0),
            },
            other => anyhow::bail!("Unknown executor '{}'", other),
        };

        Ok(Self {
            bind_addr,
            executor,
            engine: EngineConfig::from_env(),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        let ExecutorKind::Simulated { success_ratio, .. } = &self.executor;
        if !(0.0..=1.0).contains(success_ratio) {
            anyhow::bail!("simulated success ratio must be between 0 and 1");
        }

        self.engine.validate()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            executor: ExecutorKind::Simulated {
                latency: Duration::from_secs(2),
                success_ratio: 1.0,
            },
            engine: EngineConfig::default(),
        }
    }
}
