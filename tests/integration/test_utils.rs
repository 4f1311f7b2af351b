//! Candle and position builders shared by the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use posguard::models::indicators::Candle;
use posguard::models::position::{Direction, Position};
use posguard::signals::engine::EvaluationRequest;

/// Weekday `i` counted from Monday 2024-01-01.
pub fn trading_day(i: usize) -> DateTime<Utc> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    start + Duration::days(((i / 5) * 7 + i % 5) as i64)
}

/// Steady climb compounding at `rate` per candle.
pub fn create_rising_candles(count: usize, start: f64, rate: f64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = start * rate.powi(i as i32);
            let open = if i == 0 { close } else { start * rate.powi(i as i32 - 1) };
            Candle::new(open, close + 0.5, open - 0.5, close, 1000.0, trading_day(i))
        })
        .collect()
}

/// Consecutive hourly candles starting Monday 2024-01-08.
pub fn create_hourly_candles(count: usize, start: f64) -> Vec<Candle> {
    let base = Utc.with_ymd_and_hms(2024, 1, 8, 4, 0, 0).unwrap();
    create_rising_candles(count, start, 1.002)
        .into_iter()
        .enumerate()
        .map(|(i, mut candle)| {
            candle.timestamp = base + Duration::hours(i as i64);
            candle
        })
        .collect()
}

pub fn long_position(ticker: &str, entry: f64, stop_loss: f64, target1: f64, target2: f64) -> Position {
    Position {
        ticker: ticker.to_string(),
        direction: Direction::Long,
        quantity: 10.0,
        entry_price: entry,
        stop_loss,
        target1,
        target2,
        target3: None,
    }
}

/// LONG up roughly 11% on 180 rising days, which earns trailing advice.
pub fn trailing_request(ticker: &str) -> EvaluationRequest {
    EvaluationRequest {
        position: long_position(ticker, 110.0, 100.0, 130.0, 150.0),
        daily: create_rising_candles(180, 50.0, 1.005),
        weekly: None,
        hourly: None,
    }
}

/// Wednesday 2024-01-10, 10:00 exchange time.
pub fn session_open() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 4, 30, 0).unwrap()
}

/// Saturday 2024-01-13.
pub fn weekend() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 13, 4, 30, 0).unwrap()
}
