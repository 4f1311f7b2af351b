//! Rolling volume average

use crate::common::math;
use crate::indicators::error::{require, IndicatorError};
use crate::models::indicators::Candle;

/// Mean volume of the last `period` candles, including the latest one.
pub fn calculate_volume_average(candles: &[Candle], period: u32) -> Result<f64, IndicatorError> {
    let period_len = period as usize;
    require("volume_average", period_len, candles.len())?;
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    math::sma(&volumes, period_len)
        .ok_or_else(|| IndicatorError::insufficient("volume_average", period_len, candles.len()))
}
