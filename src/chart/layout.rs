//! Chart layout
//!
//! Pure geometry: given a dataset, the chart configuration, the container
//! box and the viewport, compute every bar rectangle and axis tick. Nothing
//! here touches the container, so layouts are cheap to compare in tests.

use chrono::NaiveDate;

use super::container::{ContainerBox, Viewport};
use super::scale::{format_date_tick, pad_date_domain, LinearScale, TimeScale};
use super::{RenderError, RenderResult};
use crate::config::ChartConfig;
use crate::source::Dataset;

/// Target number of ticks on each axis
pub const TICK_COUNT: usize = 10;

/// Days added on each side of a single-instant time domain
pub const SINGLE_POINT_PAD_DAYS: i64 = 45;

/// Rectangle for one data point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One axis tick: position along the axis and its label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Scales derived from the dataset and container for one render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScales {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub min_value: f64,
    pub max_value: f64,
    /// Bar units (index * (bar width + gap)) to pixels
    pub x: LinearScale,
    /// Value to bar height
    pub y: LinearScale,
    /// Date to pixel offset along the bottom axis
    pub time: TimeScale,
    /// Value to pixel offset along the right axis (inverted)
    pub value_axis: LinearScale,
}

/// Complete geometry for one render
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub plot: ContainerBox,
    pub offset: f64,
    pub svg_width: f64,
    pub svg_height: f64,
    pub scales: DerivedScales,
    pub bars: Vec<BarGeometry>,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
    /// Viewport is narrow enough that time labels are rotated
    pub narrow: bool,
}

impl DerivedScales {
    pub fn compute(dataset: &Dataset, config: &ChartConfig, plot: ContainerBox) -> Self {
        let n = dataset.len() as f64;
        let min_value = dataset.min_value();
        let max_value = dataset.max_value();
        let min_date = dataset.first_date();
        let max_date = dataset.last_date();

        let x = LinearScale::new(
            (0.0, n * (config.bar_width + config.bar_gap)),
            (0.0, plot.width),
        );
        // Bars grow from zero, so an all-negative set collapses to a zero-width domain
        let y = LinearScale::new((0.0, max_value.max(0.0)), (0.0, plot.height));
        let time = TimeScale::new(
            pad_date_domain(min_date, max_date, SINGLE_POINT_PAD_DAYS),
            (0.0, plot.width),
        );
        let value_axis = LinearScale::new((min_value, max_value), (plot.height, 0.0));

        Self {
            min_date,
            max_date,
            min_value,
            max_value,
            x,
            y,
            time,
            value_axis,
        }
    }
}

/// Compute the full chart layout
pub fn compute_layout(
    dataset: &Dataset,
    config: &ChartConfig,
    plot: ContainerBox,
    viewport: Viewport,
) -> RenderResult<ChartLayout> {
    if !(plot.width > 0.0 && plot.height > 0.0) {
        return Err(RenderError::EmptyContainer {
            width: plot.width,
            height: plot.height,
        });
    }

    let scales = DerivedScales::compute(dataset, config, plot);
    let offset = config.offset;

    let bar_width = scales.x.apply(config.bar_width);
    let step = scales.x.apply(config.bar_width + config.bar_gap);

    let bars = dataset
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let height = scales.y.apply(point.value.max(0.0)).max(0.0);
            BarGeometry {
                x: i as f64 * step + offset,
                y: plot.height - height + offset,
                width: bar_width,
                height,
            }
        })
        .collect();

    let x_ticks = scales
        .time
        .ticks(TICK_COUNT)
        .into_iter()
        .map(|date| AxisTick {
            position: scales.time.apply(date),
            label: format_date_tick(date),
        })
        .collect();

    let format_value = scales.value_axis.tick_format(TICK_COUNT);
    let y_ticks = scales
        .value_axis
        .ticks(TICK_COUNT)
        .into_iter()
        .map(|value| AxisTick {
            position: scales.value_axis.apply(value),
            label: format_value(value),
        })
        .collect();

    Ok(ChartLayout {
        plot,
        offset,
        svg_width: plot.width + 2.0 * offset,
        svg_height: plot.height + 2.0 * offset,
        scales,
        bars,
        x_ticks,
        y_ticks,
        narrow: viewport.width <= config.narrow_breakpoint,
    })
}
