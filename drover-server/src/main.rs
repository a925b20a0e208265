//! Drover Server
//!
//! HTTP control surface for the batch engine. Builds one [`JobRunner`] at
//! startup and hands it to every request handler.

mod api;
mod config;

use anyhow::{Context, Result};
use drover_engine::executor::{SimulatedExecutor, TimeoutExecutor};
use drover_engine::{AttemptExecutor, JobRunner, notifier};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ExecutorKind, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "drover_server=info,drover_engine=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Drover Server...");

    let config = ServerConfig::from_env()?;
    config.validate()?;
    info!(
        "Loaded configuration: data_dir={}, attempt_delay={:?}±{:?}",
        config.engine.data_dir.display(),
        config.engine.attempt_delay,
        config.engine.attempt_jitter
    );

    let executor = build_executor(&config);
    info!("Using '{}' executor", executor.name());

    let notifier = notifier::from_config(&config.engine);
    let runner = Arc::new(JobRunner::new(config.engine.clone(), executor, notifier));

    if config.engine.telegram.is_some() {
        info!("Telegram notifications enabled");
        // A bad token or chat id should not keep the server down
        if let Err(e) = runner.test_notification().await {
            warn!("{:#}", e);
        }
    }
    info!("Proxy pool holds {} proxies", runner.proxies().len());

    let app = api::create_router(runner);

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

fn build_executor(config: &ServerConfig) -> Arc<dyn AttemptExecutor> {
    match &config.executor {
        ExecutorKind::Simulated {
            latency,
            success_ratio,
        } => Arc::new(TimeoutExecutor::new(
            SimulatedExecutor::new(*latency, *success_ratio),
            config.engine.attempt_timeout,
        )),
    }
}
