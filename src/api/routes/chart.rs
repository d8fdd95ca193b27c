//! Chart Routes
//!
//! - GET /api/v1/chart.svg - Chart rendered for a given viewport
//! - GET /api/v1/data - The validated dataset

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{validate_dimension, DatasetResponse, ViewportParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::chart::{render_svg, Viewport};

/// GET /api/v1/chart.svg?width=&height=
///
/// Missing dimensions fall back to the configured default viewport.
pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewportParams>,
) -> ApiResult<Response> {
    let default = state.default_viewport();
    let width = validate_dimension("width", params.width.unwrap_or(default.width))
        .map_err(ApiError::Validation)?;
    let height = validate_dimension("height", params.height.unwrap_or(default.height))
        .map_err(ApiError::Validation)?;

    let dataset = state.source.fetch().await?;
    let svg = render_svg(&dataset, &state.config.chart, Viewport::new(width, height))?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// GET /api/v1/data
pub async fn dataset(State(state): State<Arc<AppState>>) -> ApiResult<Json<DatasetResponse>> {
    let dataset = state.source.fetch().await?;
    Ok(Json(DatasetResponse::new(state.source.describe(), &dataset)))
}
