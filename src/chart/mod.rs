//! Chart Renderer
//!
//! Renders the GDP dataset as an SVG bar chart:
//!
//! - **Scales**: linear bar/value scales and a time scale for the bottom axis
//! - **Layout**: pure geometry for bars and ticks
//! - **SVG**: a retained element tree serialized with `quick-xml`
//! - **Tooltips**: one per bar, released automatically on teardown
//! - **Container**: the host element, sized from an injected viewport
//!
//! ## Example
//!
//! ```rust,no_run
//! use gdpchart::chart::{render_svg, Viewport};
//! use gdpchart::config::ChartConfig;
//! use gdpchart::source::Dataset;
//!
//! let dataset = Dataset::from_pairs(&[("1947-01-01", 243.1), ("1947-04-01", 246.3)])?;
//! let svg = render_svg(&dataset, &ChartConfig::default(), Viewport::new(1280.0, 800.0))?;
//! println!("{}", svg);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod container;
mod error;
mod layout;
mod render;
mod scale;
mod svg;
mod tooltip;

pub use container::{
    Axis, Container, ContainerBox, FixedViewport, Length, LengthParseError, SharedViewport,
    Viewport, ViewportProvider,
};
pub use error::{RenderError, RenderResult};
pub use layout::{compute_layout, AxisTick, BarGeometry, ChartLayout, DerivedScales, TICK_COUNT};
pub use render::{render, render_svg};
pub use scale::{format_date_tick, format_grouped, LinearScale, TimeInterval, TimeScale};
pub use svg::SvgNode;
pub use tooltip::{quarter_label, Placement, Tooltip, TooltipContent, TooltipHandle, TooltipRegistry};
