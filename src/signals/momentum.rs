//! Momentum score on the daily series.
//!
//! Starts from a neutral baseline of 50 and adds signed component points;
//! only the final sum is clamped.

use crate::common::math;
use crate::models::indicators::{IndicatorSnapshot, Reading};
use crate::models::score::{ScoreComponent, ScoreResult};
use crate::signals::scoring::{band, bucket_above, bucket_below, scale_linear, Band};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BASELINE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumClass {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

impl fmt::Display for MomentumClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MomentumClass::StrongBullish => "STRONG BULLISH",
            MomentumClass::Bullish => "BULLISH",
            MomentumClass::Neutral => "NEUTRAL",
            MomentumClass::Bearish => "BEARISH",
            MomentumClass::StrongBearish => "STRONG BEARISH",
        };
        f.write_str(s)
    }
}

const MOMENTUM_BANDS: [Band<MomentumClass>; 5] = [
    band(30.0, MomentumClass::StrongBearish, 0.0),
    band(45.0, MomentumClass::Bearish, 0.0),
    band(55.0, MomentumClass::Neutral, 0.0),
    band(70.0, MomentumClass::Bullish, 0.0),
    band(f64::INFINITY, MomentumClass::StrongBullish, 0.0),
];

const RSI_BANDS: [Band<&str>; 6] = [
    band(70.0, "RSI overbought", -10.0),
    band(60.0, "RSI strong", 15.0),
    band(50.0, "RSI bullish", 10.0),
    band(40.0, "RSI soft", -5.0),
    band(30.0, "RSI weak", -15.0),
    band(f64::NEG_INFINITY, "RSI oversold bounce", 10.0),
];

pub fn classify_momentum(value: f64) -> MomentumClass {
    bucket_below(value, &MOMENTUM_BANDS)
        .map(|b| b.label)
        .unwrap_or(MomentumClass::Neutral)
}

pub fn score_momentum(snapshot: &IndicatorSnapshot) -> ScoreResult<MomentumClass> {
    let components = vec![
        ScoreComponent::new("Baseline", BASELINE, "neutral starting point"),
        rsi_component(&snapshot.rsi),
        macd_component(snapshot),
        ma_stack_component(snapshot),
        return_component(&snapshot.return_5d),
        trend_strength_component(snapshot),
    ];
    ScoreResult::from_components(components, classify_momentum)
}

fn rsi_component(rsi: &Reading<f64>) -> ScoreComponent {
    let Some(value) = rsi.get() else {
        return ScoreComponent::new("RSI", 0.0, rsi.unavailable_reason());
    };
    match bucket_above(value, &RSI_BANDS) {
        Some(row) => ScoreComponent::new("RSI", row.points, format!("{} ({:.0})", row.label, value)),
        None => ScoreComponent::new("RSI", 0.0, "insufficient data (degenerate input)"),
    }
}

fn macd_component(snapshot: &IndicatorSnapshot) -> ScoreComponent {
    let Some(macd) = snapshot.macd.get() else {
        return ScoreComponent::new("MACD", 0.0, snapshot.macd.unavailable_reason());
    };
    let (points, text) = match (macd.is_bullish(), macd.is_expanding()) {
        (true, true) => (20.0, "MACD bullish and expanding"),
        (true, false) => (10.0, "MACD bullish but contracting"),
        (false, true) => (-20.0, "MACD bearish and expanding"),
        (false, false) => (-10.0, "MACD bearish but contracting"),
    };
    ScoreComponent::new("MACD", points, text)
}

fn ma_stack_component(snapshot: &IndicatorSnapshot) -> ScoreComponent {
    let price = snapshot.price;
    let (ema9, sma20, sma50) = (snapshot.ema9.get(), snapshot.sma20.get(), snapshot.sma50.get());

    let mut points = 0.0;
    let mut above = 0;
    let mut checks = 0;
    let mut tally = |bullish: Option<bool>| {
        if let Some(bullish) = bullish {
            checks += 1;
            if bullish {
                above += 1;
                points += 5.0;
            } else {
                points -= 5.0;
            }
        }
    };
    tally(ema9.map(|ma| price > ma));
    tally(sma20.map(|ma| price > ma));
    tally(sma50.map(|ma| price > ma));
    tally(sma20.zip(sma50).map(|(fast, slow)| fast > slow));

    if checks == 0 {
        return ScoreComponent::new("MA stack", 0.0, snapshot.ema9.unavailable_reason());
    }
    ScoreComponent::new(
        "MA stack",
        points,
        format!("{} of {} moving-average checks bullish", above, checks),
    )
}

fn return_component(return_5d: &Reading<f64>) -> ScoreComponent {
    match return_5d.get() {
        Some(ret) => ScoreComponent::new(
            "5-day return",
            scale_linear(ret, 5.0, 15.0),
            format!("{:+.1}% over 5 candles", ret),
        ),
        None => ScoreComponent::new("5-day return", 0.0, return_5d.unavailable_reason()),
    }
}

fn trend_strength_component(snapshot: &IndicatorSnapshot) -> ScoreComponent {
    let (Some(sma20), Some(sma50)) = (snapshot.sma20.get(), snapshot.sma50.get()) else {
        return ScoreComponent::new("Trend strength", 0.0, snapshot.sma50.unavailable_reason());
    };
    let Some(divergence) = math::pct_distance(sma20, sma50, sma50) else {
        return ScoreComponent::new("Trend strength", 0.0, "insufficient data (degenerate input)");
    };
    let magnitude = (divergence * 2.0).min(10.0);
    let points = if snapshot.price > sma20 { magnitude } else { -magnitude };
    ScoreComponent::new(
        "Trend strength",
        points,
        format!("SMA20/SMA50 divergence {:.1}%", divergence),
    )
}
