//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use drover_engine::EngineError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    /// An external sink (e.g. Telegram) rejected or never answered a call
    BadGateway(String),
    InternalError(String),
    Engine(EngineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::Engine(err) => match err {
                EngineError::JobAlreadyRunning(_) => (StatusCode::CONFLICT, err.to_string()),
                EngineError::NoActiveJob => (StatusCode::NOT_FOUND, err.to_string()),
                err if err.is_input_error() => (StatusCode::BAD_REQUEST, err.to_string()),
                err => {
                    tracing::error!("Engine error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Engine(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: EngineError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_engine_error_status_codes() {
        assert_eq!(
            status_of(EngineError::JobAlreadyRunning(uuid::Uuid::new_v4())),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(EngineError::NoActiveJob), StatusCode::NOT_FOUND);
        assert_eq!(status_of(EngineError::NoProxies), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(EngineError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(EngineError::InvalidRecord {
                line: 3,
                reason: "missing comma".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(EngineError::Io(std::io::Error::other("disk full"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_local_error_status_codes() {
        let status = |err: ApiError| err.into_response().status();
        assert_eq!(
            status(ApiError::NotFound("no results".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(ApiError::BadGateway("telegram down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(ApiError::InternalError("task panicked".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
