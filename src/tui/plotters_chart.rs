//! Plotters-powered "sales by region over time" widget for Ratatui.
//!
//! Plotters gives us axes and tick labels for free; ratatui's own `Chart`
//! would need them built by hand. Output goes into the Ratatui buffer through
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// High-contrast palette, cycled per series. Mirrored by `series_color` so the
/// legend drawn by the caller matches the lines.
const PALETTE: [(u8, u8, u8); 6] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 80, 80),
    (200, 120, 255),
    (255, 255, 255),
];

/// Terminal color for series number `i`.
pub fn series_color(i: usize) -> Color {
    let (r, g, b) = PALETTE[i % PALETTE.len()];
    Color::Rgb(r, g, b)
}

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call; x is the
/// period index (0 = first month in view).
pub struct RegionTrendChart<'a> {
    /// One `(region, points)` pair per line.
    pub series: &'a [(String, Vec<(f64, f64)>)],
    /// Month labels, indexed by x.
    pub periods: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub fmt_y: &'a dyn Fn(f64) -> String,
}

impl Widget for RegionTrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out a mesh in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let periods = self.periods;
        let fmt_y = self.fmt_y;
        let series = self.series;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are noise at terminal resolution.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(periods.len().clamp(2, 6))
                .y_labels(5)
                .x_label_formatter(&|v| period_tick(periods, *v))
                .y_label_formatter(&|v| fmt_y(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (i, (_, points)) in series.iter().enumerate() {
                let (r, g, b) = PALETTE[i % PALETTE.len()];
                chart.draw_series(LineSeries::new(points.iter().copied(), &RGBColor(r, g, b)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Label for an x tick; only whole indices get a month name.
fn period_tick(periods: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    periods.get(i as usize).cloned().unwrap_or_default()
}
