//! Data source error types
//!
//! Loader failures are classified so the page boundary can decide how to
//! present them (error banner, "no data" state) instead of crashing.

use thiserror::Error;

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request never produced a usable response
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The payload was not valid JSON or did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The payload contained zero data points
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Points are out of chronological order and the order policy rejects it
    #[error("Dataset is not sorted by date (first out-of-order point at index {index})")]
    UnsortedDataset { index: usize },
}

/// Transport-level failures
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Could not connect (DNS, refused, unreachable)
    #[error("upstream unavailable")]
    Unavailable,

    /// Upstream answered with a non-success status
    #[error("upstream returned status {status}")]
    Status { status: u16 },

    /// Any other transport error
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether retrying the request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Unavailable | FetchError::Request(_) => true,
            FetchError::Status { status } => *status == 429 || *status >= 500,
            FetchError::Io(_) => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable
        } else {
            FetchError::Request(err)
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

/// Result type alias for data source operations
pub type SourceResult<T> = Result<T, SourceError>;
