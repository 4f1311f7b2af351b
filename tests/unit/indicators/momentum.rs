//! Unit tests for RSI and MACD

use crate::fixtures::{assert_close, candles_from_closes, decline, flat, geometric};
use posguard::indicators::momentum::{calculate_macd, calculate_macd_default, calculate_rsi_default};
use posguard::indicators::IndicatorError;

#[test]
fn test_rsi_needs_period_plus_one_candles() {
    let candles = geometric(14, 100.0, 1.01);
    assert_eq!(
        calculate_rsi_default(&candles),
        Err(IndicatorError::InsufficientHistory {
            indicator: "rsi",
            required: 15,
            available: 14,
        })
    );
    assert!(calculate_rsi_default(&geometric(15, 100.0, 1.01)).is_ok());
}

#[test]
fn test_rsi_extremes() {
    let up = calculate_rsi_default(&geometric(30, 100.0, 1.01)).unwrap();
    assert_eq!(up.value, 100.0);
    let down = calculate_rsi_default(&geometric(30, 100.0, 0.99)).unwrap();
    assert_eq!(down.value, 0.0);
    let flat = calculate_rsi_default(&flat(30, 100.0)).unwrap();
    assert_eq!(flat.value, 50.0);
}

#[test]
fn test_rsi_from_average_gain_and_loss() {
    // Seven +2 moves and seven -1 moves: RS = 2.
    let mut closes = vec![100.0];
    for i in 0..14 {
        let last = *closes.last().unwrap();
        closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
    }
    let rsi = calculate_rsi_default(&candles_from_closes(&closes)).unwrap();
    assert_close(rsi.value, 100.0 - 100.0 / 3.0);
    assert_eq!(rsi.period, 14);
}

#[test]
fn test_macd_minimum_history() {
    let short = geometric(34, 100.0, 1.01);
    assert_eq!(
        calculate_macd_default(&short),
        Err(IndicatorError::InsufficientHistory {
            indicator: "macd",
            required: 35,
            available: 34,
        })
    );
    assert!(calculate_macd_default(&geometric(35, 100.0, 1.01)).is_ok());
}

#[test]
fn test_macd_rejects_inverted_periods() {
    let candles = geometric(60, 100.0, 1.01);
    assert!(matches!(
        calculate_macd(&candles, 26, 12, 9),
        Err(IndicatorError::DegenerateInput { .. })
    ));
}

#[test]
fn test_macd_sign_follows_trend() {
    let up = calculate_macd_default(&geometric(120, 100.0, 1.01)).unwrap();
    assert!(up.macd > 0.0);
    assert!(up.is_bullish());

    let down = calculate_macd_default(&decline(120, 100.0, 1.005)).unwrap();
    assert!(down.macd < 0.0);
    assert!(down.is_bearish());
}

#[test]
fn test_macd_histogram_is_line_minus_signal() {
    let macd = calculate_macd_default(&geometric(80, 50.0, 1.005)).unwrap();
    assert_close(macd.histogram, macd.macd - macd.signal);
}
