//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::indicators::error::{require, IndicatorError};
use crate::models::indicators::{Candle, MacdIndicator};

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// Two histogram values are needed to tell expansion from contraction, so
/// the minimum history is `slow + signal` candles.
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Result<MacdIndicator, IndicatorError> {
    let (fast, slow, signal) = (fast_period as usize, slow_period as usize, signal_period as usize);
    if fast == 0 || signal == 0 || fast >= slow {
        return Err(IndicatorError::DegenerateInput {
            indicator: "macd",
            reason: "fast period must be shorter than slow period",
        });
    }
    require("macd", slow + signal, candles.len())?;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast_series = math::ema_series(&closes, fast);
    let slow_series = math::ema_series(&closes, slow);

    // Align both series on the close index they end at.
    let offset = slow - fast;
    let macd_series: Vec<f64> = slow_series
        .iter()
        .enumerate()
        .map(|(i, slow_ema)| fast_series[i + offset] - slow_ema)
        .collect();

    let signal_series = math::ema_series(&macd_series, signal);
    let histogram: Vec<f64> = signal_series
        .iter()
        .enumerate()
        .map(|(i, sig)| macd_series[i + signal - 1] - sig)
        .collect();

    match (histogram.as_slice(), macd_series.last(), signal_series.last()) {
        ([.., prev, last], Some(&macd_line), Some(&signal_line)) => Ok(MacdIndicator {
            macd: macd_line,
            signal: signal_line,
            histogram: *last,
            prev_histogram: *prev,
        }),
        _ => Err(IndicatorError::insufficient("macd", slow + signal, candles.len())),
    }
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Result<MacdIndicator, IndicatorError> {
    calculate_macd(candles, 12, 26, 9)
}
