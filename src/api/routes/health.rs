//! Health endpoints
//!
//! The chart has no persistent dependencies. The dataset is fetched on
//! every page load, so none of these handlers touch the upstream.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Reports where the dataset is loaded from along with process uptime.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        source: state.source.describe(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
