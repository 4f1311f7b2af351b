//! Multi-timeframe trend alignment.
//!
//! Each timeframe gets a reduced four-check trend read worth up to 8
//! points. Alignment is the share of evaluated timeframes agreeing with
//! the position; missing or short timeframes are left out entirely.

use crate::indicators::compute_snapshot;
use crate::models::indicators::{Candle, IndicatorSnapshot, Timeframe};
use crate::models::position::Direction;
use crate::models::score::{ScoreComponent, ScoreResult};
use crate::signals::scoring::{band, bucket_below, Band};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Enough history for every check, MACD being the longest.
pub const MTF_MIN_CANDLES: usize = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendBias {
    Bullish,
    Neutral,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendConviction {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlignmentClass {
    Aligned,
    Mixed,
    Conflicting,
}

const BIAS_BANDS: [Band<TrendBias>; 3] = [
    band(4.0, TrendBias::Bearish, 0.0),
    band(6.0, TrendBias::Neutral, 0.0),
    band(f64::INFINITY, TrendBias::Bullish, 0.0),
];

const ALIGNMENT_BANDS: [Band<AlignmentClass>; 3] = [
    band(40.0, AlignmentClass::Conflicting, 0.0),
    band(60.0, AlignmentClass::Mixed, 0.0),
    band(f64::INFINITY, AlignmentClass::Aligned, 0.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeTrend {
    pub timeframe: Timeframe,
    pub points: u8,
    pub bias: TrendBias,
    pub conviction: TrendConviction,
    pub checks: Vec<ScoreComponent>,
}

impl TimeframeTrend {
    pub fn agrees_with(&self, direction: Direction) -> bool {
        matches!(
            (direction, self.bias),
            (Direction::Long, TrendBias::Bullish) | (Direction::Short, TrendBias::Bearish)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtfAlignment {
    pub timeframes: Vec<TimeframeTrend>,
    pub excluded: Vec<Timeframe>,
    /// `None` when no timeframe could be evaluated.
    pub alignment: Option<ScoreResult<AlignmentClass>>,
}

impl MtfAlignment {
    pub fn alignment_pct(&self) -> Option<f64> {
        self.alignment.as_ref().map(|a| a.value)
    }
}

pub fn classify_alignment(value: f64) -> AlignmentClass {
    bucket_below(value, &ALIGNMENT_BANDS)
        .map(|b| b.label)
        .unwrap_or(AlignmentClass::Conflicting)
}

/// Trend read for one timeframe, `None` on fewer than `MTF_MIN_CANDLES`.
pub fn evaluate_timeframe(timeframe: Timeframe, candles: &[Candle]) -> Option<TimeframeTrend> {
    if candles.len() < MTF_MIN_CANDLES {
        debug!(
            timeframe = %timeframe,
            count = candles.len(),
            "mtf: timeframe excluded, short history"
        );
        return None;
    }
    let snapshot = compute_snapshot(candles)?;
    let checks = trend_checks(&snapshot);
    let points = checks.iter().map(|c| c.points).sum::<f64>() as u8;

    let bias = bucket_below(points as f64, &BIAS_BANDS)
        .map(|b| b.label)
        .unwrap_or(TrendBias::Neutral);
    let conviction = match (bias, points) {
        (TrendBias::Bullish, 8) | (TrendBias::Bearish, 0..=1) => TrendConviction::Strong,
        (TrendBias::Bullish, 7) | (TrendBias::Bearish, 2) => TrendConviction::Moderate,
        _ => TrendConviction::Weak,
    };

    Some(TimeframeTrend {
        timeframe,
        points,
        bias,
        conviction,
        checks,
    })
}

fn trend_checks(snapshot: &IndicatorSnapshot) -> Vec<ScoreComponent> {
    let rsi = match snapshot.rsi.get() {
        Some(v) if v > 55.0 => ScoreComponent::new("RSI", 2.0, format!("RSI bullish ({:.0})", v)),
        Some(v) if v >= 45.0 => ScoreComponent::new("RSI", 1.0, format!("RSI neutral ({:.0})", v)),
        Some(v) => ScoreComponent::new("RSI", 0.0, format!("RSI bearish ({:.0})", v)),
        None => ScoreComponent::new("RSI", 0.0, snapshot.rsi.unavailable_reason()),
    };
    let price_vs_sma = compare("Price vs SMA20", Some(snapshot.price), snapshot.sma20.get());
    let ema_cross = compare("EMA9 vs EMA21", snapshot.ema9.get(), snapshot.ema21.get());
    let macd = compare("MACD histogram", snapshot.macd.get().map(|m| m.histogram), Some(0.0));
    vec![rsi, price_vs_sma, ema_cross, macd]
}

fn compare(label: &str, a: Option<f64>, b: Option<f64>) -> ScoreComponent {
    match a.zip(b).and_then(|(a, b)| a.partial_cmp(&b)) {
        Some(Ordering::Greater) => ScoreComponent::new(label, 2.0, "above"),
        Some(Ordering::Equal) => ScoreComponent::new(label, 1.0, "flat"),
        Some(Ordering::Less) => ScoreComponent::new(label, 0.0, "below"),
        None => ScoreComponent::new(label, 0.0, "insufficient data"),
    }
}

/// Align every supplied timeframe with `direction`. A `None` series is
/// excluded from the denominator, as is a series that is too short.
pub fn align_timeframes(
    direction: Direction,
    series: &[(Timeframe, Option<&[Candle]>)],
) -> MtfAlignment {
    let mut timeframes = Vec::new();
    let mut excluded = Vec::new();
    for (timeframe, candles) in series {
        match candles.and_then(|c| evaluate_timeframe(*timeframe, c)) {
            Some(trend) => timeframes.push(trend),
            None => excluded.push(*timeframe),
        }
    }

    let alignment = (!timeframes.is_empty()).then(|| {
        let share = 100.0 / timeframes.len() as f64;
        let components = timeframes
            .iter()
            .map(|trend| {
                let agrees = trend.agrees_with(direction);
                ScoreComponent::new(
                    trend.timeframe.as_str(),
                    if agrees { share } else { 0.0 },
                    format!(
                        "{:?} {:?} ({} of 8)",
                        trend.conviction, trend.bias, trend.points
                    ),
                )
            })
            .collect();
        ScoreResult::from_components(components, classify_alignment)
    });

    MtfAlignment {
        timeframes,
        excluded,
        alignment,
    }
}
