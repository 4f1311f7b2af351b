//! One-pass construction of the indicator snapshot for the latest candle.

use crate::common::math;
use crate::indicators::error::{require, IndicatorError};
use crate::indicators::momentum::{calculate_macd_default, calculate_rsi_default};
use crate::indicators::trend::{calculate_ema, calculate_sma};
use crate::indicators::volatility::{calculate_atr_default, calculate_bollinger_bands_default};
use crate::indicators::volume::calculate_volume_average;
use crate::models::indicators::{Candle, IndicatorSnapshot};
use tracing::debug;

/// Candles needed for every indicator in the snapshot to be available.
pub const MIN_CANDLES: usize = 50;
const RECENT_CLOSES: usize = 5;

/// Build the snapshot. Indicators whose window is longer than the series
/// come back as `Reading::NotEnoughData`; `None` only for an empty series.
pub fn compute_snapshot(candles: &[Candle]) -> Option<IndicatorSnapshot> {
    let last = candles.last()?;

    if candles.len() < MIN_CANDLES {
        debug!(
            count = candles.len(),
            min = MIN_CANDLES,
            "snapshot: short history, some indicators will be unavailable"
        );
    }

    let prev_close = candles.len().checked_sub(2).map(|i| candles[i].close);
    let closes_start = candles.len().saturating_sub(RECENT_CLOSES);

    Some(IndicatorSnapshot {
        price: last.close,
        prev_close,
        volume: last.volume,
        rsi: calculate_rsi_default(candles).map(|rsi| rsi.value).into(),
        macd: calculate_macd_default(candles).into(),
        ema9: calculate_ema(candles, 9).into(),
        ema21: calculate_ema(candles, 21).into(),
        sma20: calculate_sma(candles, 20).into(),
        sma50: calculate_sma(candles, 50).into(),
        atr: calculate_atr_default(candles).into(),
        bollinger: calculate_bollinger_bands_default(candles).into(),
        avg_volume_20: calculate_volume_average(candles, 20).into(),
        avg_volume_5: calculate_volume_average(candles, 5).into(),
        return_5d: calculate_return(candles, 5).into(),
        recent_closes: candles[closes_start..].iter().map(|c| c.close).collect(),
    })
}

/// Percentage return over the last `periods` candles.
pub fn calculate_return(candles: &[Candle], periods: usize) -> Result<f64, IndicatorError> {
    require("return", periods + 1, candles.len())?;
    let base = candles[candles.len() - 1 - periods].close;
    let last = candles[candles.len() - 1].close;
    math::pct_change(base, last).ok_or(IndicatorError::DegenerateInput {
        indicator: "return",
        reason: "zero base close",
    })
}

impl IndicatorSnapshot {
    /// Whether every indicator of the snapshot could be computed.
    pub fn is_complete(&self) -> bool {
        self.rsi.is_available()
            && self.macd.is_available()
            && self.ema9.is_available()
            && self.sma20.is_available()
            && self.sma50.is_available()
            && self.atr.is_available()
            && self.bollinger.is_available()
            && self.avg_volume_20.is_available()
    }
}

