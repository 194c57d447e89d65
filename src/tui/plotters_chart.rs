//! Plotters-powered deal chart widget for Ratatui.
//!
//! Ratatui's built-in `Chart` widget handles overlaid lines but has no notion
//! of stacked bars, and its tick labelling is manual. Plotters gives us both
//! chart modes with one axis configuration, rendered into the terminal buffer
//! via `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::Rgb;
use crate::domain::ChartMode;

/// One overlaid line series (line mode).
pub struct SeriesLine {
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

/// One stacked bar segment (column mode), in data coordinates.
pub struct StackSegment {
    pub color: Rgb,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

/// A render-only chart description.
///
/// All series, segments, and bounds are prepared by the caller; `render()`
/// only draws. The data prep lives next to the aggregation code where it can
/// be unit tested without a terminal.
pub struct DealPlottersChart<'a> {
    pub mode: ChartMode,
    /// Line series (category order, total last).
    pub lines: &'a [SeriesLine],
    /// Stacked segments for column mode.
    pub segments: &'a [StackSegment],
    /// X bounds (calendar years).
    pub x_bounds: [f64; 2],
    /// Y bounds from the axis calculator.
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: String,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for DealPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters can fail to build a chart in a tiny area; show a hint
        // instead of panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // The widget_fn helper keeps us off the backend's internal types; it
        // routes Plotters primitives through Ratatui's canvas into the buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Label areas stay compact; terminal cells are low-res.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are clutter at terminal resolution; axes and tick
            // labels are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(&self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            match self.mode {
                ChartMode::Line => {
                    for series in self.lines {
                        let color = to_plotters(series.color);
                        chart.draw_series(LineSeries::new(series.points.iter().copied(), &color))?;
                    }
                }
                ChartMode::Column => {
                    chart.draw_series(self.segments.iter().map(|segment| {
                        Rectangle::new(
                            [(segment.x0, segment.y0), (segment.x1, segment.y1)],
                            to_plotters(segment.color).filled(),
                        )
                    }))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn to_plotters(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}
