//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - series polylines + data markers: `o`, `*`, `+`, `x` (by series index)
//! - threshold lines: `-` (drawn beneath the data)
//! - event-year markers: `|` (drawn beneath the data)

use crate::domain::ChartKind;
use crate::view::{Annotation, AxisSide, ChartData, ChartSeries, ChartSpec};

const SERIES_MARKS: [char; 4] = ['o', '*', '+', 'x'];

/// Render a chart spec to a fixed-size character grid.
///
/// Matrix and placeholder payloads fall back to their text form; series
/// payloads are plotted. Secondary-axis series are rescaled into the primary
/// y-range (flagged in the legend) since a character grid has one scale.
pub fn render_ascii_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let series = match &spec.data {
        ChartData::Series { series } => series,
        other => {
            let text = crate::report::format_chart_text(other).unwrap_or_default();
            return format!("{}\n{text}", spec.title);
        }
    };

    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = x_range(series) else {
        return format!("{}\n[info] No data points in the selected range.\n", spec.title);
    };
    let threshold_values: Vec<f64> = spec
        .annotations
        .iter()
        .filter_map(|a| match a {
            Annotation::Threshold { value, .. } => Some(*value),
            Annotation::Event { .. } => None,
        })
        .collect();
    let (y_min, y_max) = y_range(series, &threshold_values).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let rescaled = rescale_secondary(series, y_min, y_max);

    let mut grid = vec![vec![' '; width]; height];

    // Series polylines first (they claim blank cells), scatter gets no lines.
    if spec.chart != ChartKind::Scatter {
        for (idx, s) in rescaled.iter().enumerate() {
            draw_polyline(
                &mut grid,
                &s.points,
                x_min,
                x_max,
                y_min,
                y_max,
                mark(idx),
            );
        }
    }

    // Annotations fill what is still blank, so data stays on top.
    for annotation in &spec.annotations {
        match annotation {
            Annotation::Threshold { value, .. } => {
                if *value >= y_min && *value <= y_max {
                    let row = map_y(*value, y_min, y_max, height);
                    for cell in grid[row].iter_mut().filter(|c| **c == ' ') {
                        *cell = '-';
                    }
                }
            }
            Annotation::Event { year, .. } => {
                let x = *year as f64;
                if x >= x_min && x <= x_max {
                    let col = map_x(x, x_min, x_max, width);
                    for row in grid.iter_mut() {
                        if row[col] == ' ' {
                            row[col] = '|';
                        }
                    }
                }
            }
        }
    }

    // Data markers last, unconditionally.
    for (idx, s) in rescaled.iter().enumerate() {
        for &(x, y) in &s.points {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = mark(idx);
        }
    }

    let mut out = String::new();
    out.push_str(&spec.title);
    out.push('\n');
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (idx, s) in rescaled.iter().enumerate() {
        out.push_str(&format!("  {} {}\n", mark(idx), s.name));
    }
    for annotation in &spec.annotations {
        match annotation {
            Annotation::Threshold { value, label } => {
                out.push_str(&format!("  - {label} @{value}\n"));
            }
            Annotation::Event { year, label } => {
                out.push_str(&format!("  | {label} @{year}\n"));
            }
        }
    }

    out
}

fn mark(idx: usize) -> char {
    SERIES_MARKS[idx % SERIES_MARKS.len()]
}

/// Min-max rescale secondary-axis series into the primary y-range.
fn rescale_secondary(series: &[ChartSeries], y_min: f64, y_max: f64) -> Vec<ChartSeries> {
    series
        .iter()
        .map(|s| {
            if s.axis != AxisSide::Secondary {
                return s.clone();
            }
            let lo = s.points.iter().map(|&(_, y)| y).fold(f64::INFINITY, f64::min);
            let hi = s
                .points
                .iter()
                .map(|&(_, y)| y)
                .fold(f64::NEG_INFINITY, f64::max);
            let span = hi - lo;
            let points = s
                .points
                .iter()
                .map(|&(x, y)| {
                    let u = if span > 0.0 { (y - lo) / span } else { 0.5 };
                    (x, y_min + u * (y_max - y_min))
                })
                .collect();
            ChartSeries {
                name: format!("{} (rescaled)", s.name),
                axis: s.axis,
                points,
            }
        })
        .collect()
}

fn x_range(series: &[ChartSeries]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for s in series {
        for &(x, _) in &s.points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    if min_x.is_finite() && max_x.is_finite() && max_x >= min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(series: &[ChartSeries], thresholds: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in series {
        // Secondary-axis series are rescaled into the primary range later and
        // must not stretch it here.
        if s.axis == AxisSide::Secondary {
            continue;
        }
        for &(_, y) in &s.points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    for &t in thresholds {
        min_y = min_y.min(t);
        max_y = max_y.max(t);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y >= min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let span = (x_max - x_min).max(1e-12);
    let u = ((x - x_min) / span).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let span = (y_max - y_min).max(1e-12);
    let u = ((y - y_min) / span).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if points.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish); only writes blank cells.
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
