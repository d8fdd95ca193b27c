//! HTTP data source
//!
//! Fetches the GDP document from the upstream URL with an explicit timeout.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::error::{FetchError, SourceError, SourceResult};
use super::types::Dataset;
use super::DataSource;
use crate::config::SourceConfig;

/// Data source backed by a single HTTP GET
pub struct HttpSource {
    client: Client,
    config: SourceConfig,
}

impl HttpSource {
    /// Create a new HTTP source with the given configuration
    pub fn new(config: SourceConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("gdpchart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Fetch(FetchError::Request(e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Perform one request and return the body text
    async fn fetch_once(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(FetchError::from_reqwest)
    }

    /// Fetch the body, retrying transient failures with quadratic backoff
    async fn fetch_body(&self) -> Result<String, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            match self.fetch_once().await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    // Backoff: 1x, 4x, 9x...
                    let delay = Duration::from_millis(
                        self.config.retry_backoff_ms * u64::from(attempt).pow(2),
                    );
                    tracing::warn!(
                        url = %self.config.url,
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Dataset fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.config.url.clone()
    }

    async fn fetch(&self) -> SourceResult<Dataset> {
        tracing::debug!(url = %self.config.url, "Fetching dataset");

        let body = self.fetch_body().await?;
        let dataset = Dataset::from_json(&body, self.config.order_policy)?;

        tracing::info!(
            url = %self.config.url,
            points = dataset.len(),
            "Dataset fetched"
        );

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const GDP_JSON: &str = r#"{"data": [["1947-01-01", 243.1], ["1947-04-01", 246.3]]}"#;

    /// Serve a router on an ephemeral local port, returning its base URL
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn test_config(url: String) -> SourceConfig {
        SourceConfig {
            url,
            timeout_ms: 300,
            max_retries: 2,
            retry_backoff_ms: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = spawn_upstream(Router::new().route("/gdp.json", get(|| async { GDP_JSON }))).await;
        let source = HttpSource::new(test_config(format!("{}/gdp.json", base))).unwrap();

        let dataset = source.fetch().await.unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let base = spawn_upstream(Router::new().route("/gdp.json", get(|| async { "not json" }))).await;
        let source = HttpSource::new(test_config(format!("{}/gdp.json", base))).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_payload() {
        let base =
            spawn_upstream(Router::new().route("/gdp.json", get(|| async { r#"{"data": []}"# }))).await;
        let source = HttpSource::new(test_config(format!("{}/gdp.json", base))).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::EmptyDataset));
    }

    #[tokio::test]
    async fn test_server_error_retried_then_reported() {
        let hits = Arc::new(AtomicU32::new(0));
        let hits_for_route = Arc::clone(&hits);
        let router = Router::new().route(
            "/gdp.json",
            get(move || {
                let hits = Arc::clone(&hits_for_route);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    StatusCode::SERVICE_UNAVAILABLE
                }
            }),
        );
        let base = spawn_upstream(router).await;
        let source = HttpSource::new(test_config(format!("{}/gdp.json", base))).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Fetch(FetchError::Status { status: 503 })
        ));
        // Initial attempt plus two retries
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_not_retried() {
        let hits = Arc::new(AtomicU32::new(0));
        let hits_for_route = Arc::clone(&hits);
        let router = Router::new().route(
            "/gdp.json",
            get(move || {
                let hits = Arc::clone(&hits_for_route);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    StatusCode::NOT_FOUND
                }
            }),
        );
        let base = spawn_upstream(router).await;
        let source = HttpSource::new(test_config(format!("{}/gdp.json", base))).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Fetch(FetchError::Status { status: 404 })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hanging_upstream_times_out() {
        let router = Router::new().route(
            "/gdp.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                GDP_JSON
            }),
        );
        let base = spawn_upstream(router).await;
        let mut config = test_config(format!("{}/gdp.json", base));
        config.max_retries = 0;
        let source = HttpSource::new(config).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Fetch(FetchError::Timeout)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = test_config(format!("http://{}/gdp.json", addr));
        config.retry_backoff_ms = 40;
        let source = HttpSource::new(config).unwrap();

        let started = std::time::Instant::now();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Fetch(FetchError::Unavailable)));
        // Two retries: 40ms * 1 + 40ms * 4
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
