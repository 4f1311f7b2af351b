//! Unit tests for the stop-loss risk scorer

use crate::fixtures::{long, macd, neutral_snapshot, short};
use posguard::models::indicators::{IndicatorSnapshot, Reading};
use posguard::signals::sl_risk::{classify_risk, score_sl_risk, RiskLevel};
use posguard::signals::volume::classify_volume;

/// LONG at 100 with the trend, MACD and candles all on its side.
fn calm_long_snapshot() -> IndicatorSnapshot {
    let mut snapshot = neutral_snapshot(100.0);
    snapshot.ema9 = Reading::available(98.0);
    snapshot.sma20 = Reading::available(96.0);
    snapshot.sma50 = Reading::available(92.0);
    snapshot.macd = macd(0.5, 0.2);
    snapshot.rsi = Reading::available(60.0);
    snapshot.recent_closes = vec![96.0, 97.0, 98.0, 99.0, 100.0];
    snapshot.prev_close = Some(99.0);
    snapshot
}

#[test]
fn test_calm_position_is_safe() {
    let position = long(95.0, 90.0, 110.0, 120.0);
    let snapshot = calm_long_snapshot();
    let result = score_sl_risk(&position, &snapshot, &classify_volume(&snapshot));
    assert_eq!(result.value, 0.0);
    assert_eq!(result.classification, RiskLevel::Safe);
    assert!(result.components.is_empty());
}

#[test]
fn test_distance_bands() {
    let snapshot = calm_long_snapshot();
    let volume = classify_volume(&snapshot);
    let score = |stop: f64| score_sl_risk(&long(100.0, stop, 110.0, 120.0), &snapshot, &volume).value;
    assert_eq!(score(99.5), 40.0);
    assert_eq!(score(98.5), 30.0);
    assert_eq!(score(97.5), 15.0);
    assert_eq!(score(96.0), 0.0);
}

#[test]
fn test_trend_factor_is_capped() {
    let position = long(105.0, 80.0, 120.0, 130.0);
    let mut snapshot = calm_long_snapshot();
    snapshot.ema9 = Reading::available(101.0);
    snapshot.sma20 = Reading::available(102.0);
    snapshot.sma50 = Reading::available(103.0);
    let result = score_sl_risk(&position, &snapshot, &classify_volume(&snapshot));
    let trend = &result.components[0];
    assert_eq!(trend.label, "Trend");
    assert_eq!(trend.points, 25.0);
    assert!(trend.rationale.contains("Death cross forming"));
}

#[test]
fn test_short_reads_the_mirror_image() {
    let position = short(95.0, 100.5, 90.0, 85.0);
    let mut snapshot = neutral_snapshot(100.0);
    snapshot.ema9 = Reading::available(99.0);
    snapshot.sma20 = Reading::available(98.0);
    snapshot.sma50 = Reading::available(110.0);
    snapshot.macd = macd(0.4, 0.1);
    snapshot.rsi = Reading::available(70.0);
    snapshot.recent_closes = vec![96.0, 97.0, 98.0, 99.0, 100.0];

    let result = score_sl_risk(&position, &snapshot, &classify_volume(&snapshot));
    let points: Vec<(&str, f64)> = result
        .components
        .iter()
        .map(|c| (c.label.as_str(), c.points))
        .collect();
    assert_eq!(
        points,
        vec![
            ("Distance to SL", 40.0),
            ("Trend", 18.0),
            ("MACD", 15.0),
            ("RSI", 10.0),
            ("Candles", 10.0),
        ]
    );
    assert_eq!(result.value, 93.0);
    assert_eq!(result.classification, RiskLevel::Critical);
}

#[test]
fn test_unavailable_factors_are_recorded_with_zero_points() {
    let position = long(100.0, 90.0, 110.0, 120.0);
    let mut snapshot = calm_long_snapshot();
    snapshot.rsi = Reading::NotEnoughData {
        required: 15,
        available: 10,
    };
    snapshot.macd = Reading::NotEnoughData {
        required: 35,
        available: 10,
    };
    snapshot.recent_closes = vec![99.0, 100.0];

    let result = score_sl_risk(&position, &snapshot, &classify_volume(&snapshot));
    let labels: Vec<&str> = result.components.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["MACD", "RSI", "Candles"]);
    assert!(result.components.iter().all(|c| c.points == 0.0));
    assert_eq!(
        result.components[1].rationale,
        "insufficient data (10 of 15 candles)"
    );
    assert_eq!(result.value, 0.0);
}

#[test]
fn test_risk_bands() {
    assert_eq!(classify_risk(19.9), RiskLevel::Safe);
    assert_eq!(classify_risk(20.0), RiskLevel::Low);
    assert_eq!(classify_risk(49.0), RiskLevel::Low);
    assert_eq!(classify_risk(50.0), RiskLevel::Medium);
    assert_eq!(classify_risk(70.0), RiskLevel::High);
    assert_eq!(classify_risk(79.0), RiskLevel::High);
    assert_eq!(classify_risk(80.0), RiskLevel::Critical);
    assert_eq!(classify_risk(100.0), RiskLevel::Critical);
}
