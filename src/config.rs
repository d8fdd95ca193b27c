//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chart::Length;
use crate::source::OrderPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub order_policy: OrderPolicy,
}

fn default_source_url() -> String {
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/GDP-data.json"
        .to_string()
}

fn default_timeout() -> u64 {
    10_000 // 10 seconds
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    500
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_ms: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
            order_policy: OrderPolicy::default(),
        }
    }
}

/// Chart display and drawing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_x_label")]
    pub x_label: String,

    #[serde(default = "default_y_label")]
    pub y_label: String,

    /// Container width relative to the viewport
    #[serde(default = "default_width")]
    pub width: Length,

    /// Container height relative to the viewport
    #[serde(default = "default_height")]
    pub height: Length,

    #[serde(default = "default_bar_width")]
    pub bar_width: f64,

    #[serde(default = "default_bar_gap")]
    pub bar_gap: f64,

    /// Margin reserved around the plot for axes and labels
    #[serde(default = "default_offset")]
    pub offset: f64,

    #[serde(default = "default_bar_fill")]
    pub bar_fill: String,

    /// Viewports at or below this width get rotated time-axis labels
    #[serde(default = "default_narrow_breakpoint")]
    pub narrow_breakpoint: f64,

    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Viewport assumed for the first server-side render
    #[serde(default = "default_viewport_width")]
    pub default_viewport_width: f64,

    #[serde(default = "default_viewport_height")]
    pub default_viewport_height: f64,
}

fn default_title() -> String {
    "United States GDP".to_string()
}

fn default_x_label() -> String {
    "Year".to_string()
}

fn default_y_label() -> String {
    "Gross Domestic Product (Billions)".to_string()
}

fn default_width() -> Length {
    Length::ViewportWidth(75.0)
}

fn default_height() -> Length {
    Length::ViewportHeight(75.0)
}

fn default_bar_width() -> f64 {
    5.0
}

fn default_bar_gap() -> f64 {
    1.0
}

fn default_offset() -> f64 {
    50.0
}

fn default_bar_fill() -> String {
    "blue".to_string()
}

fn default_narrow_breakpoint() -> f64 {
    800.0
}

fn default_debounce() -> u64 {
    500
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    800.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            width: default_width(),
            height: default_height(),
            bar_width: default_bar_width(),
            bar_gap: default_bar_gap(),
            offset: default_offset(),
            bar_fill: default_bar_fill(),
            narrow_breakpoint: default_narrow_breakpoint(),
            debounce_ms: default_debounce(),
            default_viewport_width: default_viewport_width(),
            default_viewport_height: default_viewport_height(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// How long a served page may take to open its WebSocket
    #[serde(default = "default_page_ttl")]
    pub page_ttl_secs: u64,

    /// Upper bound on datasets held for pages that have not connected yet
    #[serde(default = "default_max_pending_pages")]
    pub max_pending_pages: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_page_ttl() -> u64 {
    60
}

fn default_max_pending_pages() -> usize {
    1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            page_ttl_secs: default_page_ttl(),
            max_pending_pages: default_max_pending_pages(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("gdpchart").join("config.toml")),
            Some(PathBuf::from("/etc/gdpchart/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GDPCHART_SOURCE_URL") {
            self.source.url = url;
        }

        if let Some(host) = lookup("GDPCHART_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("GDPCHART_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(ms) = lookup("GDPCHART_DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
            self.chart.debounce_ms = ms;
        }

        if let Some(level) = lookup("GDPCHART_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GDPCHART_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# gdpchart Configuration
#
# Environment variables override these settings:
# - GDPCHART_SOURCE_URL
# - GDPCHART_HOST
# - GDPCHART_PORT
# - GDPCHART_DEBOUNCE_MS
# - GDPCHART_LOG_LEVEL
# - GDPCHART_LOG_FORMAT

[source]
# Upstream JSON document: { "data": [["YYYY-MM-DD", value], ...] }
url = "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/GDP-data.json"

# Request timeout (ms)
timeout_ms = 10000

# Retries for timeouts, connection failures, 429 and 5xx
max_retries = 2
retry_backoff_ms = 500

# "sort" (warn and sort) or "reject" out-of-order data
order_policy = "sort"

[chart]
title = "United States GDP"
x_label = "Year"
y_label = "Gross Domestic Product (Billions)"

# Container size relative to the viewport (vw, vh, %, px)
width = "75vw"
height = "75vh"

bar_width = 5.0
bar_gap = 1.0
offset = 50.0
bar_fill = "blue"

# Rotate time-axis labels at or below this viewport width
narrow_breakpoint = 800.0

# Quiet period before a resize triggers a redraw (ms)
debounce_ms = 500

[server]
host = "0.0.0.0"
port = 8080

# Seconds a page keeps its dataset while waiting for its WebSocket
page_ttl_secs = 60

# Datasets held for pages that have not connected yet
max_pending_pages = 1024

[logging]
# trace, debug, info, warn, error
level = "info"

# "pretty" or "json"
format = "pretty"
"#
    .to_string()
}
