//! Bollinger Bands indicator

use crate::common::math;
use crate::indicators::error::{require, IndicatorError};
use crate::models::indicators::{BollingerBands, Candle};

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * standard deviation)
/// Lower Band = Middle - (std_dev * standard deviation)
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Result<BollingerBands, IndicatorError> {
    let period_len = period as usize;
    require("bollinger", period_len, candles.len())?;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let insufficient = || IndicatorError::insufficient("bollinger", period_len, candles.len());
    let middle = math::sma(&closes, period_len).ok_or_else(insufficient)?;
    let std = math::standard_deviation(&closes, period_len).ok_or_else(insufficient)?;

    Ok(BollingerBands {
        upper: middle + (std_dev * std),
        middle,
        lower: middle - (std_dev * std),
    })
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Result<BollingerBands, IndicatorError> {
    calculate_bollinger_bands(candles, 20, 2.0)
}
