//! Job API Handlers
//!
//! HTTP handlers for submitting and controlling the batch job.

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use drover_core::domain::job::JobSnapshot;
use drover_core::dto::job::{ControlResponse, ResultsLocation, SubmitJob, SubmitResponse};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::{AppState, blocking};

/// POST /job/submit
/// Start a job from a JSON list of records
pub async fn submit_job(
    State(runner): State<AppState>,
    Json(req): Json<SubmitJob>,
) -> ApiResult<Json<SubmitResponse>> {
    let job_id = blocking(&runner, move |runner| runner.submit(req.records)).await?;
    Ok(Json(submit_response(&runner, job_id)))
}

/// POST /job/upload
/// Start a job from an `identifier,secret` text body
pub async fn upload_job(
    State(runner): State<AppState>,
    body: String,
) -> ApiResult<Json<SubmitResponse>> {
    let job_id = blocking(&runner, move |runner| runner.submit_upload(&body)).await?;
    Ok(Json(submit_response(&runner, job_id)))
}

/// GET /job/status
/// Snapshot of the current (or last) job, or an idle snapshot
pub async fn job_status(State(runner): State<AppState>) -> Json<JobSnapshot> {
    Json(runner.status())
}

/// POST /job/pause
pub async fn pause_job(State(runner): State<AppState>) -> ApiResult<Json<ControlResponse>> {
    runner.pause()?;
    Ok(Json(ControlResponse::ok("Job paused")))
}

/// POST /job/resume
pub async fn resume_job(State(runner): State<AppState>) -> ApiResult<Json<ControlResponse>> {
    runner.resume()?;
    Ok(Json(ControlResponse::ok("Job resumed")))
}

/// POST /job/reset
/// Cancel any active job and clear spooled uploads
pub async fn reset_job(State(runner): State<AppState>) -> ApiResult<Json<ControlResponse>> {
    let report = blocking(&runner, |runner| Ok(runner.reset())).await?;
    let message = match report.cancelled_job {
        Some(id) => format!(
            "Cancelled job {}, removed {} uploads",
            id, report.removed_uploads
        ),
        None => format!("Removed {} uploads", report.removed_uploads),
    };
    Ok(Json(ControlResponse::ok(message)))
}

/// GET /job/results
/// Where the last completed job's artifact lives
pub async fn results_location(State(runner): State<AppState>) -> Json<ResultsLocation> {
    Json(ResultsLocation {
        job_id: runner.current_job_id(),
        path: runner
            .results_location()
            .map(|path| path.display().to_string()),
    })
}

/// GET /job/results/download
/// Raw results artifact of the last completed job
pub async fn download_results(State(runner): State<AppState>) -> ApiResult<Response> {
    let path = runner
        .results_location()
        .ok_or_else(|| ApiError::NotFound("No results available yet".to_string()))?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        // Removed between the location lookup and the read
        std::io::ErrorKind::NotFound => {
            ApiError::NotFound(format!("Results file {} is gone", path.display()))
        }
        _ => ApiError::Engine(e.into()),
    })?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results.json".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn submit_response(runner: &AppState, job_id: Uuid) -> SubmitResponse {
    let snapshot = runner.status();
    SubmitResponse {
        job_id,
        total: snapshot.total as usize,
        workers: snapshot.workers.len(),
    }
}
