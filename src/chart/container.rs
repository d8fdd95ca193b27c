//! Chart container and viewport
//!
//! The container is the host element the chart renders into. Its pixel box
//! is derived from the viewport through relative lengths (`75vw`, `75vh`),
//! and the viewport itself comes from an injected provider so rendering
//! can be exercised without a real display surface.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use super::svg::SvgNode;
use super::tooltip::{TooltipHandle, TooltipRegistry};

/// Viewport size in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Read-only access to the current viewport size
pub trait ViewportProvider: Send + Sync {
    fn viewport(&self) -> Viewport;
}

/// A viewport that never changes
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub Viewport);

impl ViewportProvider for FixedViewport {
    fn viewport(&self) -> Viewport {
        self.0
    }
}

/// A viewport updated by resize events
#[derive(Debug, Clone)]
pub struct SharedViewport {
    inner: Arc<RwLock<Viewport>>,
}

impl SharedViewport {
    pub fn new(initial: Viewport) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn set(&self, viewport: Viewport) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = viewport;
    }
}

impl ViewportProvider for SharedViewport {
    fn viewport(&self) -> Viewport {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// A CSS-like length relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Length {
    /// Percentage of viewport width (`vw`)
    ViewportWidth(f64),
    /// Percentage of viewport height (`vh`)
    ViewportHeight(f64),
    /// Percentage of the viewport along the same axis (`%`)
    Percent(f64),
    /// Absolute pixels (`px` or bare number)
    Pixels(f64),
}

/// Axis a length is resolved along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Length {
    /// Resolve to pixels for the given viewport
    pub fn resolve(&self, viewport: Viewport, axis: Axis) -> f64 {
        let px = match self {
            Length::ViewportWidth(v) => viewport.width * v / 100.0,
            Length::ViewportHeight(v) => viewport.height * v / 100.0,
            Length::Percent(v) => match axis {
                Axis::Horizontal => viewport.width * v / 100.0,
                Axis::Vertical => viewport.height * v / 100.0,
            },
            Length::Pixels(v) => *v,
        };
        px.max(0.0).floor()
    }
}

/// Error for unparseable length strings
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid length {0:?} (expected e.g. \"75vw\", \"75vh\", \"50%\", \"600px\")")]
pub struct LengthParseError(pub String);

impl FromStr for Length {
    type Err = LengthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = |n: &str| {
            n.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
        };

        let trimmed = s.trim();
        let length = if let Some(n) = trimmed.strip_suffix("vw") {
            number(n).map(Length::ViewportWidth)
        } else if let Some(n) = trimmed.strip_suffix("vh") {
            number(n).map(Length::ViewportHeight)
        } else if let Some(n) = trimmed.strip_suffix('%') {
            number(n).map(Length::Percent)
        } else if let Some(n) = trimmed.strip_suffix("px") {
            number(n).map(Length::Pixels)
        } else {
            number(trimmed).map(Length::Pixels)
        };

        length.ok_or_else(|| LengthParseError(s.to_string()))
    }
}

impl TryFrom<String> for Length {
    type Error = LengthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::ViewportWidth(v) => write!(f, "{}vw", v),
            Length::ViewportHeight(v) => write!(f, "{}vh", v),
            Length::Percent(v) => write!(f, "{}%", v),
            Length::Pixels(v) => write!(f, "{}px", v),
        }
    }
}

/// Laid-out pixel box of the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBox {
    pub width: f64,
    pub height: f64,
}

/// Host element holding the rendered SVG tree and its tooltip instances
pub struct Container {
    viewport: Arc<dyn ViewportProvider>,
    width: Length,
    height: Length,
    children: Vec<SvgNode>,
    tooltips: Vec<TooltipHandle>,
    registry: TooltipRegistry,
}

impl Container {
    pub fn new(viewport: Arc<dyn ViewportProvider>, width: Length, height: Length) -> Self {
        Self {
            viewport,
            width,
            height,
            children: Vec::new(),
            tooltips: Vec::new(),
            registry: TooltipRegistry::new(),
        }
    }

    /// Current viewport as reported by the provider
    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// Current laid-out pixel box
    pub fn client_box(&self) -> ContainerBox {
        let viewport = self.viewport();
        ContainerBox {
            width: self.width.resolve(viewport, Axis::Horizontal),
            height: self.height.resolve(viewport, Axis::Vertical),
        }
    }

    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    pub fn tooltips(&self) -> &[TooltipHandle] {
        &self.tooltips
    }

    pub fn registry(&self) -> &TooltipRegistry {
        &self.registry
    }

    pub(crate) fn append(&mut self, node: SvgNode) {
        self.children.push(node);
    }

    pub(crate) fn adopt_tooltips(&mut self, handles: Vec<TooltipHandle>) {
        self.tooltips.extend(handles);
    }

    /// Remove every child node and release every tooltip instance
    pub fn clear(&mut self) {
        let released = self.tooltips.len();
        self.children.clear();
        self.tooltips.clear();
        if released > 0 {
            tracing::trace!(released, "Container cleared");
        }
    }

    /// Serialize the container's content
    pub fn inner_svg(&self) -> Result<String, super::RenderError> {
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.to_xml()?);
        }
        Ok(out)
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lengths() {
        assert_eq!("75vw".parse::<Length>().unwrap(), Length::ViewportWidth(75.0));
        assert_eq!("75vh".parse::<Length>().unwrap(), Length::ViewportHeight(75.0));
        assert_eq!("50%".parse::<Length>().unwrap(), Length::Percent(50.0));
        assert_eq!("600px".parse::<Length>().unwrap(), Length::Pixels(600.0));
        assert_eq!("200".parse::<Length>().unwrap(), Length::Pixels(200.0));
        assert!("wide".parse::<Length>().is_err());
        assert!("-5px".parse::<Length>().is_err());
    }

    #[test]
    fn test_resolve_lengths() {
        let viewport = Viewport::new(1000.0, 800.0);
        assert_eq!(Length::ViewportWidth(75.0).resolve(viewport, Axis::Vertical), 750.0);
        assert_eq!(Length::ViewportHeight(75.0).resolve(viewport, Axis::Horizontal), 600.0);
        assert_eq!(Length::Percent(50.0).resolve(viewport, Axis::Vertical), 400.0);
        assert_eq!(Length::Pixels(123.4).resolve(viewport, Axis::Horizontal), 123.0);
    }

    #[test]
    fn test_client_box_follows_shared_viewport() {
        let viewport = SharedViewport::new(Viewport::new(1000.0, 800.0));
        let container = Container::new(
            Arc::new(viewport.clone()),
            Length::ViewportWidth(75.0),
            Length::ViewportHeight(75.0),
        );
        assert_eq!(
            container.client_box(),
            ContainerBox {
                width: 750.0,
                height: 600.0
            }
        );

        viewport.set(Viewport::new(400.0, 400.0));
        assert_eq!(
            container.client_box(),
            ContainerBox {
                width: 300.0,
                height: 300.0
            }
        );
    }

    #[test]
    fn test_length_display() {
        assert_eq!(Length::ViewportWidth(75.0).to_string(), "75vw");
        assert_eq!(Length::Pixels(600.0).to_string(), "600px");
    }
}
