//! Drover Engine
//!
//! Batch runner that drives one attempt per record across a pool of proxies.
//!
//! Architecture:
//! - Configuration: settings from environment or defaults
//! - Proxy pool: persisted list of proxy endpoints, one per worker
//! - Executors: pluggable strategy performing a single attempt
//! - Job: partitions records, runs one sequential worker per proxy, aggregates
//!   counters and writes the results artifact
//! - Runner: single-active-job façade with status, pause/resume and reset
//! - Notifier: best-effort external alerts

pub mod config;
pub mod control;
pub mod delay;
pub mod error;
pub mod executor;
pub mod input;
pub mod job;
pub mod notifier;
pub mod proxy;
pub mod runner;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use executor::AttemptExecutor;
pub use notifier::Notifier;
pub use proxy::ProxyPool;
pub use runner::{JobRunner, ResetReport};
