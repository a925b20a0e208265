//! Notifier API Handlers

use axum::{Json, extract::State};
use drover_core::dto::job::ControlResponse;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /notifier/test
/// Send a "configured" message through the notification sink and wait for it
pub async fn test_notifier(State(runner): State<AppState>) -> ApiResult<Json<ControlResponse>> {
    runner
        .test_notification()
        .await
        .map_err(|e| ApiError::BadGateway(format!("{:#}", e)))?;

    Ok(Json(ControlResponse::ok(format!(
        "Test notification sent via {}",
        runner.notifier_sink()
    ))))
}
