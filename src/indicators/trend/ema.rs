//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::error::{require, IndicatorError};
use crate::models::indicators::Candle;

/// Calculate the latest EMA of closes for a specific period
pub fn calculate_ema(candles: &[Candle], period: u32) -> Result<f64, IndicatorError> {
    require("ema", period as usize, candles.len())?;
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema(&closes, period as usize).ok_or_else(|| IndicatorError::insufficient("ema", period as usize, candles.len()))
}
