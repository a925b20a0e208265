//! API Module
//!
//! HTTP API layer over the job runner.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod job;
pub mod notifier;
pub mod proxy;

use axum::{
    Router,
    routing::{get, post},
};
use drover_engine::JobRunner;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use self::error::{ApiError, ApiResult};

/// Shared handler state
pub type AppState = Arc<JobRunner>;

/// Runs a runner call that touches the filesystem on the blocking pool
pub(crate) async fn blocking<T, F>(runner: &AppState, call: F) -> ApiResult<T>
where
    F: FnOnce(&JobRunner) -> drover_engine::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let runner = Arc::clone(runner);
    tokio::task::spawn_blocking(move || call(&runner))
        .await
        .map_err(|e| ApiError::InternalError(format!("Blocking task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Create the main API router with all endpoints
pub fn create_router(runner: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Proxy endpoints
        .route("/proxies", post(proxy::load_proxies))
        .route("/proxies", get(proxy::list_proxies))
        // Job endpoints
        .route("/job/submit", post(job::submit_job))
        .route("/job/upload", post(job::upload_job))
        .route("/job/status", get(job::job_status))
        .route("/job/pause", post(job::pause_job))
        .route("/job/resume", post(job::resume_job))
        .route("/job/reset", post(job::reset_job))
        .route("/job/results", get(job::results_location))
        .route("/job/results/download", get(job::download_results))
        // Notification endpoints
        .route("/notifier/test", post(notifier::test_notifier))
        // Add state and middleware
        .with_state(runner)
        .layer(TraceLayer::new_for_http())
}
