//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::chart::RenderError;
use crate::source::SourceError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Dataset could not be loaded
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Chart could not be rendered
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Source(SourceError::Fetch(_)) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_FETCH_ERROR")
            }
            ApiError::Source(SourceError::Parse(_))
            | ApiError::Source(SourceError::UnsortedDataset { .. }) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_PARSE_ERROR")
            }
            ApiError::Source(SourceError::EmptyDataset) => (StatusCode::NOT_FOUND, "NO_DATA"),
            ApiError::Render(RenderError::EmptyContainer { .. }) => {
                (StatusCode::BAD_REQUEST, "EMPTY_CONTAINER")
            }
            ApiError::Render(RenderError::Svg(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;

    #[test]
    fn test_source_error_mapping() {
        let err = ApiError::from(SourceError::Fetch(FetchError::Timeout));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_GATEWAY, "UPSTREAM_FETCH_ERROR")
        );

        let err = ApiError::from(SourceError::Parse("bad".to_string()));
        assert_eq!(err.status_and_code().1, "UPSTREAM_PARSE_ERROR");

        let err = ApiError::from(SourceError::EmptyDataset);
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "NO_DATA"));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Validation("width".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
