//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::indicators::error::{require, IndicatorError};
use crate::models::indicators::Candle;

pub fn calculate_sma(candles: &[Candle], period: u32) -> Result<f64, IndicatorError> {
    require("sma", period as usize, candles.len())?;
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::sma(&closes, period as usize).ok_or_else(|| IndicatorError::insufficient("sma", period as usize, candles.len()))
}
