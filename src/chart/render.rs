//! Chart Renderer
//!
//! Turns a layout into an SVG tree inside a container and binds one tooltip
//! per bar. Every render starts by tearing down whatever the container
//! already holds.

use std::sync::Arc;

use super::container::{Container, FixedViewport, Viewport};
use super::layout::{compute_layout, ChartLayout};
use super::svg::{fmt_num, SvgNode};
use super::tooltip::{Placement, Tooltip, TooltipContent, TooltipHandle};
use super::RenderResult;
use crate::config::ChartConfig;
use crate::source::Dataset;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const AXIS_COLOR: &str = "currentColor";
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Render `dataset` into `container`, replacing any previous render
pub fn render(container: &mut Container, dataset: &Dataset, config: &ChartConfig) -> RenderResult<()> {
    container.clear();

    let plot = container.client_box();
    let viewport = container.viewport();
    let layout = compute_layout(dataset, config, plot, viewport)?;

    let tooltips = bind_tooltips(container, dataset);
    let svg = build_svg(&layout, dataset, &tooltips, config);

    tracing::debug!(
        bars = layout.bars.len(),
        width = plot.width,
        height = plot.height,
        narrow = layout.narrow,
        "Chart rendered"
    );

    container.append(svg);
    container.adopt_tooltips(tooltips);
    Ok(())
}

/// Render into a throwaway container and return the SVG markup
pub fn render_svg(dataset: &Dataset, config: &ChartConfig, viewport: Viewport) -> RenderResult<String> {
    let mut container = Container::new(
        Arc::new(FixedViewport(viewport)),
        config.width,
        config.height,
    );
    render(&mut container, dataset, config)?;
    container.inner_svg()
}

fn bind_tooltips(container: &Container, dataset: &Dataset) -> Vec<TooltipHandle> {
    let registry = container.registry();
    dataset
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            registry.attach(Tooltip {
                target: bar_id(i),
                content: TooltipContent::for_point(point),
                placement: Placement::Left,
                follow_cursor: true,
            })
        })
        .collect()
}

fn bar_id(index: usize) -> String {
    format!("bar-{}", index)
}

fn build_svg(
    layout: &ChartLayout,
    dataset: &Dataset,
    tooltips: &[TooltipHandle],
    config: &ChartConfig,
) -> SvgNode {
    SvgNode::new("svg")
        .attr("xmlns", SVG_NS)
        .attr("id", "chart")
        .num("width", layout.svg_width)
        .num("height", layout.svg_height)
        .attr(
            "viewBox",
            format!("0 0 {} {}", fmt_num(layout.svg_width), fmt_num(layout.svg_height)),
        )
        .child(bars(layout, dataset, tooltips, config))
        .child(bottom_axis(layout))
        .child(right_axis(layout))
        .children(axis_labels(layout, config))
}

/// Bars carry their tooltip binding as data attributes read by the page script
fn bars(
    layout: &ChartLayout,
    dataset: &Dataset,
    tooltips: &[TooltipHandle],
    config: &ChartConfig,
) -> SvgNode {
    let rects = layout
        .bars
        .iter()
        .zip(dataset.points())
        .zip(tooltips)
        .map(|((bar, point), handle)| {
            let tooltip = handle.tooltip();
            SvgNode::new("rect")
                .attr("id", &tooltip.target)
                .attr("class", "bar")
                .attr("data-date", &point.label)
                .attr("data-gdp", point.value)
                .attr("data-tooltip-placement", tooltip.placement.as_str())
                .attr("data-tooltip-follow", tooltip.follow_cursor)
                .num("x", bar.x)
                .num("y", bar.y)
                .num("width", bar.width)
                .num("height", bar.height)
                .attr("fill", &config.bar_fill)
                .child(SvgNode::new("title").text(tooltip.content.text()))
        });

    SvgNode::new("g").attr("id", "bars").children(rects)
}

fn bottom_axis(layout: &ChartLayout) -> SvgNode {
    let width = layout.plot.width;

    let ticks = layout.x_ticks.iter().map(|tick| {
        let label = SvgNode::new("text").attr("fill", AXIS_COLOR).text(tick.label.clone());
        let label = if layout.narrow {
            label
                .attr("text-anchor", "start")
                .attr("transform", "rotate(45)")
                .attr("dx", "0.8em")
                .attr("dy", "0.15em")
                .num("y", TICK_SIZE + TICK_PADDING)
        } else {
            label
                .attr("text-anchor", "middle")
                .attr("dy", "0.71em")
                .num("y", TICK_SIZE + TICK_PADDING)
        };

        SvgNode::new("g")
            .attr("class", "tick")
            .attr("transform", format!("translate({},0)", fmt_num(tick.position)))
            .child(
                SvgNode::new("line")
                    .attr("stroke", AXIS_COLOR)
                    .num("y2", TICK_SIZE),
            )
            .child(label)
    });

    SvgNode::new("g")
        .attr("id", "x-axis")
        .attr("class", "axis")
        .attr(
            "transform",
            format!(
                "translate({},{})",
                fmt_num(layout.offset),
                fmt_num(layout.plot.height + layout.offset)
            ),
        )
        .child(
            SvgNode::new("path")
                .attr("class", "domain")
                .attr("stroke", AXIS_COLOR)
                .attr("d", format!("M0,{}V0H{}V{}", fmt_num(TICK_SIZE), fmt_num(width), fmt_num(TICK_SIZE))),
        )
        .children(ticks)
}

fn right_axis(layout: &ChartLayout) -> SvgNode {
    let width = layout.plot.width;
    let height = layout.plot.height;

    let ticks = layout.y_ticks.iter().map(|tick| {
        SvgNode::new("g")
            .attr("class", "tick")
            .attr("transform", format!("translate(0,{})", fmt_num(tick.position)))
            .child(
                SvgNode::new("line")
                    .attr("class", "grid")
                    .attr("stroke", AXIS_COLOR)
                    .attr("stroke-opacity", "0.3")
                    .attr("stroke-dasharray", "4 4")
                    .num("x2", -width),
            )
            .child(
                SvgNode::new("text")
                    .attr("fill", AXIS_COLOR)
                    .num("x", TICK_SIZE + TICK_PADDING)
                    .attr("dy", "-0.4em")
                    .text(tick.label.clone()),
            )
    });

    SvgNode::new("g")
        .attr("id", "y-axis")
        .attr("class", "axis")
        .attr(
            "transform",
            format!(
                "translate({},{})",
                fmt_num(width + layout.offset),
                fmt_num(layout.offset)
            ),
        )
        .child(
            SvgNode::new("path")
                .attr("class", "domain")
                .attr("stroke", AXIS_COLOR)
                .attr("d", format!("M{},0H0V{}H{}", fmt_num(TICK_SIZE), fmt_num(height), fmt_num(TICK_SIZE))),
        )
        .children(ticks)
}

fn axis_labels(layout: &ChartLayout, config: &ChartConfig) -> [SvgNode; 2] {
    let x_label = SvgNode::new("text")
        .attr("id", "x-label")
        .attr("text-anchor", "middle")
        .num("x", layout.offset + layout.plot.width / 2.0)
        .num("y", layout.svg_height - layout.offset / 8.0)
        .text(config.x_label.clone());

    let y_label = SvgNode::new("text")
        .attr("id", "y-label")
        .attr("text-anchor", "middle")
        .attr("transform", "rotate(-90)")
        .num("x", -(layout.offset + layout.plot.height / 2.0))
        .num("y", layout.offset / 2.0)
        .text(config.y_label.clone());

    [x_label, y_label]
}
