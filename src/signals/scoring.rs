//! Threshold tables shared by every scorer
//!
//! Each heuristic is an ordered table of `(bound, label, points)` rows and a
//! single lookup decides which row a value falls in.

/// One row of a threshold table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<L> {
    pub bound: f64,
    pub label: L,
    pub points: f64,
}

pub const fn band<L>(bound: f64, label: L, points: f64) -> Band<L> {
    Band {
        bound,
        label,
        points,
    }
}

/// First row whose bound is strictly greater than `value`.
/// Tables are sorted by ascending bound and usually end at `f64::INFINITY`.
pub fn bucket_below<L>(value: f64, bands: &[Band<L>]) -> Option<&Band<L>> {
    if value.is_nan() {
        return None;
    }
    bands.iter().find(|band| value < band.bound)
}

/// First row whose bound is strictly less than `value`.
/// Tables are sorted by descending bound and usually end at `f64::NEG_INFINITY`.
pub fn bucket_above<L>(value: f64, bands: &[Band<L>]) -> Option<&Band<L>> {
    if value.is_nan() {
        return None;
    }
    bands.iter().find(|band| value > band.bound)
}

/// Linear scale of `value` so that `full_at` maps to `max_points`, clamped
/// to `[-max_points, max_points]`.
pub fn scale_linear(value: f64, full_at: f64, max_points: f64) -> f64 {
    if full_at == 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / full_at * max_points).clamp(-max_points, max_points)
}
