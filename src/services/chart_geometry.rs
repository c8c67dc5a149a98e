/// ============================================================
///  Chart Geometry Engine
///
///  Pure coordinate computation for the dashboard charts:
///   1. Category bars – a small set of labeled magnitudes scaled
///      to width fractions in [0, 1]
///   2. Time-series polyline – an arbitrary-length sample series
///      projected into a fixed 100×100 viewport with axis ticks
///
///  Both layouts share the same zero-floor rule: the scale is
///  max(values ∪ {1}), so an all-zero series still has a defined,
///  finite scale and never divides by zero.
/// ============================================================

use serde::Serialize;
use utoipa::ToSchema;

// ─── Viewport constants ──────────────────────────────────────
/// Side of the square logical viewport, independent of on-screen pixels.
pub const VIEWPORT_SIDE: f64 = 100.0;
/// Inner padding between the viewport edge and the plot area.
pub const PADDING: f64 = 12.0;
/// Usable plot width/height.
pub const SPAN: f64 = VIEWPORT_SIDE - 2.0 * PADDING;

// ─── Category bars ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryBar {
    pub label: String,
    /// Original magnitude, passed through for the numeric readout
    pub value: f64,
    pub color: String,
    /// Bar width as a fraction of the widest bar, 0.0–1.0
    pub width_fraction: f64,
}

/// Lay out a set of `(label, magnitude, color)` bars.
///
/// The widest bar always gets `width_fraction == 1.0`; if every magnitude
/// is zero the scale floors at 1 and every fraction is 0.0.
pub fn layout_category_bars(items: &[(&str, f64, &str)]) -> Vec<CategoryBar> {
    let scale = items.iter().map(|(_, m, _)| *m).fold(1.0_f64, f64::max);
    items
        .iter()
        .map(|(label, magnitude, color)| CategoryBar {
            label: (*label).to_string(),
            value: *magnitude,
            color: (*color).to_string(),
            width_fraction: magnitude / scale,
        })
        .collect()
}

// ─── Time-series polyline ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// One axis tick: viewport coordinate along the axis plus its label.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SeriesLayout {
    /// Polyline vertices in sample order
    pub points: Vec<PlotPoint>,
    /// Three horizontal gridline ticks at 0 / 50 / 100 % of the scale
    pub y_ticks: Vec<AxisTick>,
    /// One tick per sample, labeled with the 1-based hour index
    pub x_ticks: Vec<AxisTick>,
}

/// Horizontal position of sample `i` in a series of `n`.
///
/// Degenerate policy: a single-sample (or empty) series pins everything to
/// the left edge of the plot area instead of dividing by n − 1 = 0.
fn x_at(i: usize, n: usize) -> f64 {
    if n > 1 {
        PADDING + (i as f64 / (n - 1) as f64) * SPAN
    } else {
        PADDING
    }
}

/// Vertical position of value `v` against scale `max_y`. The viewport y
/// axis grows downward: 0 maps to the bottom edge, `max_y` to the top.
fn y_at(v: f64, max_y: f64) -> f64 {
    PADDING + SPAN - (v / max_y) * SPAN
}

/// Project a chronological sample series into the viewport.
pub fn layout_time_series(samples: &[f64]) -> SeriesLayout {
    let n = samples.len();
    let max_y = samples.iter().copied().fold(1.0_f64, f64::max);

    let points = samples
        .iter()
        .enumerate()
        .map(|(i, &v)| PlotPoint { x: x_at(i, n), y: y_at(v, max_y) })
        .collect();

    let y_ticks = [0.0, 0.5, 1.0]
        .iter()
        .map(|&t| AxisTick {
            position: y_at(t * max_y, max_y),
            label: format!("{:.1}", t * max_y),
        })
        .collect();

    let x_ticks = (0..n)
        .map(|i| AxisTick {
            position: x_at(i, n),
            label: format!("H{}", i + 1),
        })
        .collect();

    SeriesLayout { points, y_ticks, x_ticks }
}
