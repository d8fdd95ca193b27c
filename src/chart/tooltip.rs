//! Bar tooltips
//!
//! Each rendered bar gets one tooltip instance. Instances are tracked by a
//! registry and released when their handle is dropped, so tearing down a
//! render (or dropping the container) can never leak them.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::source::DataPoint;

/// Fiscal quarter label for a two-digit month segment
pub fn quarter_label(month: &str) -> &'static str {
    match month {
        "01" => "Q1",
        "04" => "Q2",
        "07" => "Q3",
        "10" => "Q4",
        _ => "",
    }
}

/// Where the tooltip is anchored relative to its bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Left,
    Right,
    Top,
    Bottom,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Left => "left",
            Placement::Right => "right",
            Placement::Top => "top",
            Placement::Bottom => "bottom",
        }
    }
}

/// Text shown when hovering a bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub value_line: String,
    pub date_line: String,
}

impl TooltipContent {
    pub fn for_point(point: &DataPoint) -> Self {
        Self {
            value_line: format!("Value: ${} Billion", point.value),
            date_line: format!("Date: {}-{}", point.year(), quarter_label(point.month())),
        }
    }

    /// Both lines joined for plain-text display
    pub fn text(&self) -> String {
        format!("{}\n{}", self.value_line, self.date_line)
    }
}

/// Tooltip instance parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    /// Id of the element the tooltip is bound to
    pub target: String,
    pub content: TooltipContent,
    pub placement: Placement,
    pub follow_cursor: bool,
}

/// Tracks live tooltip instances
#[derive(Debug, Clone, Default)]
pub struct TooltipRegistry {
    live: Arc<AtomicUsize>,
    created: Arc<AtomicU64>,
}

impl TooltipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a tooltip; it stays live until the returned handle is dropped
    pub fn attach(&self, tooltip: Tooltip) -> TooltipHandle {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.created.fetch_add(1, Ordering::SeqCst);
        TooltipHandle {
            tooltip,
            live: Arc::clone(&self.live),
        }
    }

    /// Number of tooltip instances currently bound
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Number of tooltip instances ever bound
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }
}

/// A bound tooltip instance; releases itself on drop
#[derive(Debug)]
pub struct TooltipHandle {
    tooltip: Tooltip,
    live: Arc<AtomicUsize>,
}

impl TooltipHandle {
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }
}

impl Drop for TooltipHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_labels() {
        assert_eq!(quarter_label("01"), "Q1");
        assert_eq!(quarter_label("04"), "Q2");
        assert_eq!(quarter_label("07"), "Q3");
        assert_eq!(quarter_label("10"), "Q4");
        assert_eq!(quarter_label("02"), "");
        assert_eq!(quarter_label("12"), "");
        assert_eq!(quarter_label(""), "");
    }

    #[test]
    fn test_tooltip_content() {
        let point = DataPoint::parse("1947-04-01", 246.3).unwrap();
        let content = TooltipContent::for_point(&point);
        assert_eq!(content.value_line, "Value: $246.3 Billion");
        assert_eq!(content.date_line, "Date: 1947-Q2");

        let point = DataPoint::parse("2000-10-01", 10000.0).unwrap();
        let content = TooltipContent::for_point(&point);
        assert_eq!(content.value_line, "Value: $10000 Billion");
        assert_eq!(content.date_line, "Date: 2000-Q4");
    }

    #[test]
    fn test_off_quarter_month_is_blank() {
        let point = DataPoint::parse("1950-02-01", 300.0).unwrap();
        assert_eq!(TooltipContent::for_point(&point).date_line, "Date: 1950-");
    }

    #[test]
    fn test_handles_release_on_drop() {
        let registry = TooltipRegistry::new();
        let point = DataPoint::parse("1947-01-01", 243.1).unwrap();

        let handles: Vec<_> = (0..3)
            .map(|i| {
                registry.attach(Tooltip {
                    target: format!("bar-{}", i),
                    content: TooltipContent::for_point(&point),
                    placement: Placement::Left,
                    follow_cursor: true,
                })
            })
            .collect();

        assert_eq!(registry.live(), 3);
        drop(handles);
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.created(), 3);
    }
}
