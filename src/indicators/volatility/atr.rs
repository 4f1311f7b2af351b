//! ATR (Average True Range) indicator

use crate::common::math;
use crate::indicators::error::{require, IndicatorError};
use crate::models::indicators::Candle;

/// Calculate ATR (Average True Range)
///
/// Simple average of the last `period` true ranges, so `period + 1`
/// candles are required. A window with no range at all is degenerate.
pub fn calculate_atr(candles: &[Candle], period: u32) -> Result<f64, IndicatorError> {
    let period_len = period as usize;
    require("atr", period_len + 1, candles.len())?;

    let tr_values: Vec<f64> = candles
        .windows(2)
        .map(|pair| math::true_range(pair[1].high, pair[1].low, pair[0].close))
        .collect();

    let atr = math::sma(&tr_values, period_len)
        .ok_or_else(|| IndicatorError::insufficient("atr", period_len + 1, candles.len()))?;

    if atr <= 0.0 || !atr.is_finite() {
        return Err(IndicatorError::DegenerateInput {
            indicator: "atr",
            reason: "zero true range across the window",
        });
    }
    Ok(atr)
}

/// Calculate ATR with default period (14)
pub fn calculate_atr_default(candles: &[Candle]) -> Result<f64, IndicatorError> {
    calculate_atr(candles, 14)
}
