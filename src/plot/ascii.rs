//! ASCII/Unicode charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Two chart kinds:
//! - horizontal bars (`#`), one row per key
//! - a multi-series trend over months, one marker letter per series

use std::collections::BTreeMap;

use crate::domain::PeriodLabel;

/// Render labelled horizontal bars scaled to the largest value.
///
/// `fmt` renders the value printed after each bar.
pub fn render_bar_chart(title: &str, entries: &[(String, f64)], width: usize, fmt: impl Fn(f64) -> String) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    if entries.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_width = entries
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        .min(20);
    let bar_width = width.max(10);
    let max = entries
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);

    for (key, value) in entries {
        let len = if max > 0.0 && value.is_finite() && *value > 0.0 {
            ((value / max) * bar_width as f64).round() as usize
        } else {
            0
        };
        let label = crate::report::truncate(key, label_width);
        out.push_str(
            format!(
                "{label:<label_width$} |{} {}",
                "#".repeat(len.min(bar_width)),
                fmt(*value)
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Render one line per series over the months in `trend`.
///
/// Each series is drawn with a distinct letter, preferably the first letter of
/// its name; the legend below the grid maps letters back to names. The y axis
/// always includes 0.
pub fn render_trend_plot(trend: &BTreeMap<PeriodLabel, BTreeMap<String, f64>>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let periods: Vec<PeriodLabel> = trend.keys().copied().collect();
    if periods.is_empty() {
        return "Trend: (no data)\n".to_string();
    }

    let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (i, row) in trend.values().enumerate() {
        for (name, v) in row {
            series
                .entry(name.as_str())
                .or_insert_with(|| vec![0.0; periods.len()])[i] = *v;
        }
    }

    let (y_min, y_max) = y_range(&series);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let x_max = (periods.len() - 1) as f64;

    let mut grid = vec![vec![' '; width]; height];
    let mut legend = Vec::new();
    let mut used = Vec::new();

    for (name, values) in &series {
        let marker = pick_marker(name, &used);
        used.push(marker);
        legend.push(format!("{marker}={name}"));

        let mut prev = None;
        for (i, &v) in values.iter().enumerate() {
            let x = map_x(i as f64, 0.0, x_max, width);
            let y = map_y(v, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, x, y, '.');
            }
            grid[y][x] = marker;
            prev = Some((x, y));
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Trend: {} .. {} | y=[{}, {}]\n",
        periods[0],
        periods[periods.len() - 1],
        axis_label(y_min),
        axis_label(y_max),
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(&legend.join("  "));
    out.push('\n');

    out
}

/// Value range of every series, anchored at 0. A flat range is widened by 1.
fn y_range(series: &BTreeMap<&str, Vec<f64>>) -> (f64, f64) {
    let (min_y, max_y) = series
        .values()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if max_y > min_y { (min_y, max_y) } else { (min_y, min_y + 1.0) }
}

/// Whole-number label; small negatives print as `0`, not `-0`.
fn axis_label(v: f64) -> String {
    let r = v.round();
    format!("{:.0}", if r == 0.0 { 0.0 } else { r })
}

/// First letter of `name` not already taken, then any free letter or digit.
fn pick_marker(name: &str, used: &[char]) -> char {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .chain('A'..='Z')
        .chain('0'..='9')
        .find(|c| !used.contains(c))
        .unwrap_or('?')
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    if t_max <= t_min {
        return 0;
    }
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Never overwrites a non-blank cell.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
