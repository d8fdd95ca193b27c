//! Local data sources
//!
//! `FileSource` reads the upstream JSON shape from disk; `StaticSource`
//! hands out an in-memory dataset.

use async_trait::async_trait;
use std::path::PathBuf;

use super::error::{FetchError, SourceResult};
use super::types::{Dataset, OrderPolicy};
use super::DataSource;

/// Reads a `{ "data": [...] }` document from a file
pub struct FileSource {
    path: PathBuf,
    policy: OrderPolicy,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, policy: OrderPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> SourceResult<Dataset> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(FetchError::Io)?;

        let dataset = Dataset::from_json(&content, self.policy)?;
        tracing::info!(path = ?self.path, points = dataset.len(), "Dataset loaded from file");
        Ok(dataset)
    }
}

/// Always returns the same dataset
#[derive(Debug, Clone)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn describe(&self) -> String {
        format!("static ({} points)", self.dataset.len())
    }

    async fn fetch(&self) -> SourceResult<Dataset> {
        Ok(self.dataset.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data": [["2015-07-01", 18064.7]]}}"#).unwrap();

        let source = FileSource::new(file.path(), OrderPolicy::Sort);
        let dataset = source.fetch().await.unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.max_value(), 18064.7);
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"), OrderPolicy::Sort);

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Fetch(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn test_static_source() {
        let dataset = Dataset::from_pairs(&[("1947-01-01", 243.1)]).unwrap();
        let source = StaticSource::new(dataset.clone());
        assert_eq!(source.fetch().await.unwrap(), dataset);
    }
}
