//! # gdpchart
//!
//! U.S. GDP bar chart: loads a quarterly GDP series from a JSON endpoint,
//! renders it as an SVG bar chart with axes and per-bar tooltips, and
//! redraws it (debounced) whenever the viewport is resized.
//!
//! ## Modules
//!
//! - [`source`]: Data loader (HTTP, file, static)
//! - [`chart`]: Scales, layout, SVG rendering, tooltips
//! - [`lifecycle`]: Debouncer and resize/redraw state machine
//! - [`api`]: Page server with Axum
//! - [`websocket`]: Resize events in, redraws out
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gdpchart::chart::{render_svg, Viewport};
//! use gdpchart::config::Config;
//! use gdpchart::source::{DataSource, HttpSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     let source = HttpSource::new(config.source.clone())?;
//!     let dataset = source.fetch().await?;
//!
//!     let svg = render_svg(&dataset, &config.chart, Viewport::new(1280.0, 800.0))?;
//!     println!("{}", svg);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod source;
pub mod websocket;

// Re-export top-level types for convenience
pub use source::{
    DataPoint, DataSource, Dataset, FetchError, FileSource, HttpSource, OrderPolicy, SourceError,
    SourceResult, StaticSource,
};

pub use chart::{
    render, render_svg, Container, Length, RenderError, RenderResult, Viewport, ViewportProvider,
};

pub use lifecycle::{Debouncer, RedrawController, RedrawEvent, RedrawState};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ChartConfig, Config, ConfigError, LoggingConfig, ServerConfig, SourceConfig};
