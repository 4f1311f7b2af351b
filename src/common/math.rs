//! Moving averages, dispersion and range primitives.
//!
//! Every function returns `None` when the input is too short for the
//! requested period instead of producing NaN.

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Smoothing factor for an EMA of the given period.
pub fn ema_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Advance an EMA by one value.
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let alpha = ema_alpha(period);
    value * alpha + previous * (1.0 - alpha)
}

/// EMA series seeded with the SMA of the first `period` values.
///
/// The returned series has `values.len() - period + 1` entries; entry `i`
/// is aligned with `values[i + period - 1]`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(seed);
    let mut previous = seed;
    for &value in &values[period..] {
        previous = ema_from_previous(value, previous, period);
        series.push(previous);
    }
    series
}

/// Latest EMA value.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).last().copied()
}

/// Sample standard deviation (n - 1) of the last `period` values.
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    if period < 2 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
    Some(variance.sqrt())
}

/// True range of a candle given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Percentage change from `from` to `to`, `None` when `from` is zero.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 || !from.is_finite() || !to.is_finite() {
        return None;
    }
    Some((to - from) / from * 100.0)
}

/// Relative distance between two prices as a percentage of `base`.
pub fn pct_distance(a: f64, b: f64, base: f64) -> Option<f64> {
    if base == 0.0 || !base.is_finite() {
        return None;
    }
    Some((a - b).abs() / base.abs() * 100.0)
}
