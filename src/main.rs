//! gdpchart server
//!
//! Run with: cargo run --bin gdpchart
//!
//! Configuration is read from the first config file found
//! (`~/.config/gdpchart/config.toml`, `/etc/gdpchart/config.toml`,
//! `./config.toml`) with `GDPCHART_*` environment overrides.

use anyhow::Context;
use gdpchart::api::{serve, AppState};
use gdpchart::config::Config;
use gdpchart::source::HttpSource;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    gdpchart::logging::init(&config.logging).context("Failed to initialize logging")?;

    tracing::info!("Starting gdpchart v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dataset source: {}", config.source.url);
    tracing::info!(
        "Container: {} x {}, redraw debounce {}ms",
        config.chart.width,
        config.chart.height,
        config.chart.debounce_ms
    );

    let source = Arc::new(HttpSource::new(config.source.clone()).context("Failed to create HTTP client")?);
    let server = config.server.clone();

    serve(AppState::new(source, config), &server).await?;

    tracing::info!("gdpchart stopped");
    Ok(())
}
