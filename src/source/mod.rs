//! Data Loader
//!
//! Loads the GDP dataset once per page load. Sources:
//! - HTTP (the upstream JSON document)
//! - Local file (offline rendering)
//! - Static (tests and embedding)
//!
//! Every source returns a validated [`Dataset`] or a classified
//! [`SourceError`].

mod error;
mod file;
mod http;
mod types;

pub use error::{FetchError, SourceError, SourceResult};
pub use file::{FileSource, StaticSource};
pub use http::HttpSource;
pub use types::{DataPoint, Dataset, OrderPolicy, RawPayload, DATE_FORMAT};

use async_trait::async_trait;

/// Common trait for all dataset sources
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable location of the data (URL, path)
    fn describe(&self) -> String;

    /// Load and validate the dataset
    async fn fetch(&self) -> SourceResult<Dataset>;
}
