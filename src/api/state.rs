//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::chart::Viewport;
use crate::config::Config;
use crate::source::{DataSource, Dataset};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Where the dataset is loaded from on every page load
    pub source: Arc<dyn DataSource>,
    /// Full configuration
    pub config: Arc<Config>,
    /// Datasets of served pages, waiting for the page's WebSocket
    pub pages: Arc<PageStore>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>, config: Config) -> Self {
        let pages = PageStore::new(
            Duration::from_secs(config.server.page_ttl_secs),
            config.server.max_pending_pages,
        );

        Self {
            source,
            config: Arc::new(config),
            pages: Arc::new(pages),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Viewport assumed before the browser reports its own
    pub fn default_viewport(&self) -> Viewport {
        Viewport::new(
            self.config.chart.default_viewport_width,
            self.config.chart.default_viewport_height,
        )
    }
}

/// Hands the dataset loaded for a page over to that page's WebSocket
///
/// Entries expire after `ttl` and are taken at most once. When full, the
/// oldest entry is evicted.
pub struct PageStore {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, (tokio::time::Instant, Dataset)>>,
}

impl PageStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Hold `dataset` and return the token the page passes back
    pub fn insert(&self, dataset: Dataset) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let now = tokio::time::Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        entries.retain(|_, (stored_at, _)| now.duration_since(*stored_at) < self.ttl);

        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, (stored_at, _))| *stored_at)
                .map(|(token, _)| token.clone());
            match oldest {
                Some(oldest) => {
                    tracing::debug!(token = %oldest, "Evicting unclaimed page dataset");
                    entries.remove(&oldest);
                }
                None => break,
            }
        }

        entries.insert(token.clone(), (now, dataset));
        token
    }

    /// Claim the dataset for `token`, if it exists and has not expired
    pub fn take(&self, token: &str) -> Option<Dataset> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let (stored_at, dataset) = entries.remove(token)?;
        (stored_at.elapsed() < self.ttl).then_some(dataset)
    }

    /// Number of unclaimed entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_pairs(&[("1947-01-01", 243.1)]).unwrap()
    }

    #[test]
    fn test_take_once() {
        let store = PageStore::new(Duration::from_secs(60), 8);
        let token = store.insert(dataset());

        assert_eq!(store.take(&token), Some(dataset()));
        assert_eq!(store.take(&token), None);
        assert_eq!(store.take("unknown"), None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = PageStore::new(Duration::from_secs(60), 2);
        let first = store.insert(dataset());
        std::thread::sleep(Duration::from_millis(2));
        let second = store.insert(dataset());
        std::thread::sleep(Duration::from_millis(2));
        let third = store.insert(dataset());

        assert_eq!(store.len(), 2);
        assert!(store.take(&first).is_none());
        assert!(store.take(&second).is_some());
        assert!(store.take(&third).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let store = PageStore::new(Duration::from_secs(60), 8);
        let stale = store.insert(dataset());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(store.take(&stale).is_none());

        let _fresh = store.insert(dataset());
        let _other = store.insert(dataset());
        tokio::time::sleep(Duration::from_secs(61)).await;
        store.insert(dataset());
        // Expired entries are purged on insert
        assert_eq!(store.len(), 1);
    }
}
