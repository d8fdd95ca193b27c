//! Chart rendering errors

use thiserror::Error;

/// Errors that can occur while rendering a chart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The container has no drawable area
    #[error("Container has no drawable area ({width}x{height})")]
    EmptyContainer { width: f64, height: f64 },

    /// SVG serialization failed
    #[error("SVG error: {0}")]
    Svg(String),
}

/// Result type alias for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
