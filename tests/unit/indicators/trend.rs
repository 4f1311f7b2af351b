//! Unit tests for EMA and SMA

use crate::fixtures::{assert_close, candles_from_closes};
use posguard::indicators::trend::{calculate_ema, calculate_sma};
use posguard::indicators::IndicatorError;

fn ramp(count: usize) -> Vec<posguard::models::indicators::Candle> {
    let closes: Vec<f64> = (1..=count).map(|v| v as f64).collect();
    candles_from_closes(&closes)
}

#[test]
fn test_ema_insufficient_data() {
    let candles = ramp(10);
    assert!(matches!(
        calculate_ema(&candles, 20),
        Err(IndicatorError::InsufficientHistory {
            required: 20,
            available: 10,
            ..
        })
    ));
}

#[test]
fn test_ema_is_seeded_with_sma() {
    // Period 3 has alpha 0.5; on a unit ramp the EMA trails by one step.
    let candles = ramp(10);
    assert_close(calculate_ema(&candles, 3).unwrap(), 9.0);
}

#[test]
fn test_sma_uses_latest_window() {
    assert_close(calculate_sma(&ramp(10), 4).unwrap(), 8.5);
    assert!(calculate_sma(&ramp(3), 4).is_err());
}
