//! RSI (Relative Strength Index) indicator

use crate::indicators::error::{require, IndicatorError};
use crate::models::indicators::{Candle, RsiIndicator};

/// Calculate RSI indicator
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss over the last `period` close-to-close
/// changes (simple averages). Needs `period + 1` candles.
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Result<RsiIndicator, IndicatorError> {
    let period_len = period as usize;
    require("rsi", period_len + 1, candles.len())?;

    let window = &candles[candles.len() - (period_len + 1)..];
    let (gains, losses) = window.windows(2).fold((0.0, 0.0), |(gains, losses), pair| {
        let change = pair[1].close - pair[0].close;
        if change > 0.0 {
            (gains + change, losses)
        } else {
            (gains, losses - change)
        }
    });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    let value = if avg_loss == 0.0 && avg_gain == 0.0 {
        // Flat window: no directional pressure.
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    };

    Ok(RsiIndicator { value, period })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Result<RsiIndicator, IndicatorError> {
    calculate_rsi(candles, 14)
}
