//! Core data types for the GDP dataset
//!
//! - `DataPoint`: one quarterly observation
//! - `Dataset`: a validated, non-empty, chronologically ordered series
//! - `OrderPolicy`: what to do with out-of-order input

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{SourceError, SourceResult};

/// Date format used by the upstream payload
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single quarterly GDP observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    /// Date string exactly as delivered (e.g. "1947-01-01")
    pub label: String,
    /// Parsed calendar date
    pub date: NaiveDate,
    /// GDP in billions of dollars
    pub value: f64,
}

impl DataPoint {
    /// Parse a point from the raw `[date, value]` pair
    pub fn parse(label: impl Into<String>, value: f64) -> SourceResult<Self> {
        let label = label.into();
        let date = NaiveDate::parse_from_str(&label, DATE_FORMAT)
            .map_err(|e| SourceError::Parse(format!("invalid date {:?}: {}", label, e)))?;

        if !value.is_finite() {
            return Err(SourceError::Parse(format!(
                "non-finite value for {}: {}",
                label, value
            )));
        }

        Ok(Self { label, date, value })
    }

    /// Year segment of the date label
    pub fn year(&self) -> &str {
        self.label.split('-').next().unwrap_or_default()
    }

    /// Month segment of the date label
    pub fn month(&self) -> &str {
        self.label.split('-').nth(1).unwrap_or_default()
    }
}

/// How out-of-order input is handled when building a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Stable-sort by date and log a warning
    #[default]
    Sort,
    /// Refuse the payload
    Reject,
}

/// Wire shape of the upstream document: `{ "data": [[date, value], ...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct RawPayload {
    pub data: Vec<(String, f64)>,
}

/// Ordered, non-empty sequence of data points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    points: Vec<DataPoint>,
}

impl Dataset {
    /// Build a dataset from parsed points, enforcing non-emptiness and order
    pub fn new(mut points: Vec<DataPoint>, policy: OrderPolicy) -> SourceResult<Self> {
        if points.is_empty() {
            return Err(SourceError::EmptyDataset);
        }

        if let Some(index) = first_unsorted(&points) {
            match policy {
                OrderPolicy::Reject => return Err(SourceError::UnsortedDataset { index }),
                OrderPolicy::Sort => {
                    tracing::warn!(
                        index,
                        points = points.len(),
                        "Dataset not sorted by date, sorting"
                    );
                    points.sort_by_key(|p| p.date);
                }
            }
        }

        Ok(Self { points })
    }

    /// Build a dataset from the raw wire payload
    pub fn from_raw(raw: RawPayload, policy: OrderPolicy) -> SourceResult<Self> {
        let points = raw
            .data
            .into_iter()
            .map(|(label, value)| DataPoint::parse(label, value))
            .collect::<SourceResult<Vec<_>>>()?;

        Self::new(points, policy)
    }

    /// Parse a JSON document in the upstream shape
    pub fn from_json(json: &str, policy: OrderPolicy) -> SourceResult<Self> {
        let raw: RawPayload = serde_json::from_str(json)?;
        Self::from_raw(raw, policy)
    }

    /// Convenience constructor from `(date, value)` pairs
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, f64)]) -> SourceResult<Self> {
        let points = pairs
            .iter()
            .map(|(label, value)| DataPoint::parse(label.as_ref(), *value))
            .collect::<SourceResult<Vec<_>>>()?;

        Self::new(points, OrderPolicy::Sort)
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_value(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

/// Index of the first point that is earlier than its predecessor
fn first_unsorted(points: &[DataPoint]) -> Option<usize> {
    points
        .windows(2)
        .position(|w| w[1].date < w[0].date)
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        let json = r#"{
            "source_name": "FRED",
            "data": [["1947-01-01", 243.1], ["1947-04-01", 246.3]]
        }"#;
        let dataset = Dataset::from_json(json, OrderPolicy::Sort).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.min_value(), 243.1);
        assert_eq!(dataset.max_value(), 246.3);
        assert_eq!(dataset.first_date(), NaiveDate::from_ymd_opt(1947, 1, 1).unwrap());
        assert_eq!(dataset.last_date(), NaiveDate::from_ymd_opt(1947, 4, 1).unwrap());
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = Dataset::from_json(r#"{"data": []}"#, OrderPolicy::Sort).unwrap_err();
        assert!(matches!(err, SourceError::EmptyDataset));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = Dataset::from_json(r#"{"values": []}"#, OrderPolicy::Sort).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));

        let err = Dataset::from_json("<html>", OrderPolicy::Sort).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let err = Dataset::from_json(r#"{"data": [["1947-13-01", 1.0]]}"#, OrderPolicy::Sort)
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_unsorted_policies() {
        let json = r#"{"data": [["1947-04-01", 246.3], ["1947-01-01", 243.1]]}"#;

        let err = Dataset::from_json(json, OrderPolicy::Reject).unwrap_err();
        assert!(matches!(err, SourceError::UnsortedDataset { index: 1 }));

        let dataset = Dataset::from_json(json, OrderPolicy::Sort).unwrap();
        assert_eq!(dataset.points()[0].label, "1947-01-01");
        assert_eq!(dataset.points()[1].label, "1947-04-01");
    }

    #[test]
    fn test_date_segments() {
        let point = DataPoint::parse("1999-10-01", 9000.0).unwrap();
        assert_eq!(point.year(), "1999");
        assert_eq!(point.month(), "10");
    }
}
