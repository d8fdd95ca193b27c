//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.

use serde::{Deserialize, Serialize};

use crate::source::Dataset;

/// Largest viewport dimension accepted from clients
pub const MAX_VIEWPORT_PX: f64 = 16_384.0;

/// Viewport query parameters for `GET /api/v1/chart.svg`
#[derive(Debug, Deserialize)]
pub struct ViewportParams {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Check a client-supplied viewport dimension
pub fn validate_dimension(name: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value > 0.0 && value <= MAX_VIEWPORT_PX {
        Ok(value)
    } else {
        Err(format!(
            "{} must be a number in (0, {}], got {}",
            name, MAX_VIEWPORT_PX, value
        ))
    }
}

/// Dataset response
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub source: String,
    pub count: usize,
    pub first_date: String,
    pub last_date: String,
    pub min_value: f64,
    pub max_value: f64,
    /// `[date, value]` pairs in chronological order
    pub data: Vec<(String, f64)>,
}

impl DatasetResponse {
    pub fn new(source: String, dataset: &Dataset) -> Self {
        Self {
            source,
            count: dataset.len(),
            first_date: dataset.first_date().to_string(),
            last_date: dataset.last_date().to_string(),
            min_value: dataset.min_value(),
            max_value: dataset.max_value(),
            data: dataset
                .points()
                .iter()
                .map(|p| (p.label.clone(), p.value))
                .collect(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub source: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dimension() {
        assert_eq!(validate_dimension("width", 800.0), Ok(800.0));
        assert!(validate_dimension("width", 0.0).is_err());
        assert!(validate_dimension("width", -1.0).is_err());
        assert!(validate_dimension("width", f64::INFINITY).is_err());
        assert!(validate_dimension("height", 100_000.0).is_err());
    }

    #[test]
    fn test_dataset_response() {
        let dataset = Dataset::from_pairs(&[("1947-01-01", 243.1), ("1947-04-01", 246.3)]).unwrap();
        let response = DatasetResponse::new("test".to_string(), &dataset);

        assert_eq!(response.count, 2);
        assert_eq!(response.first_date, "1947-01-01");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#"["1947-04-01",246.3]"#));
    }
}
