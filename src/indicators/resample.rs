//! Timeframe resampling

use crate::models::indicators::Candle;
use chrono::Datelike;

/// Aggregate daily candles into ISO-week candles: first open, max high,
/// min low, last close, summed volume, stamped with the week's first candle.
pub fn resample_weekly(daily: &[Candle]) -> Vec<Candle> {
    let mut weekly: Vec<Candle> = Vec::new();
    let mut current_week = None;

    for candle in daily {
        let iso = candle.timestamp.iso_week();
        let key = (iso.year(), iso.week());
        match weekly.last_mut() {
            Some(bar) if current_week == Some(key) => {
                bar.high = bar.high.max(candle.high);
                bar.low = bar.low.min(candle.low);
                bar.close = candle.close;
                bar.volume += candle.volume;
            }
            _ => {
                weekly.push(*candle);
                current_week = Some(key);
            }
        }
    }
    weekly
}
