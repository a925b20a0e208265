//! Proxy API Handlers
//!
//! HTTP handlers for managing the proxy pool.

use axum::{Json, extract::State};
use drover_core::dto::proxy::{LoadProxiesResponse, ProxyList};

use crate::api::error::ApiResult;
use crate::api::{AppState, blocking};

/// POST /proxies
/// Replace the proxy pool with the newline-separated list in the body
pub async fn load_proxies(
    State(runner): State<AppState>,
    body: String,
) -> ApiResult<Json<LoadProxiesResponse>> {
    let count = blocking(&runner, move |runner| runner.proxies().load(&body)).await?;
    tracing::info!("Loaded {} proxies", count);
    Ok(Json(LoadProxiesResponse { count }))
}

/// GET /proxies
/// List the proxies currently in the pool
pub async fn list_proxies(State(runner): State<AppState>) -> Json<ProxyList> {
    Json(ProxyList {
        proxies: runner.proxies().list(),
    })
}
