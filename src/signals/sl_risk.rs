//! Stop-loss risk: how likely the position is to run into its stop.
//!
//! Six additive factors in a fixed order; the raw sum can reach 110 and is
//! clamped to 100.

use crate::common::math;
use crate::models::alert::AlertPriority;
use crate::models::indicators::{IndicatorSnapshot, Reading};
use crate::models::position::{Direction, Position};
use crate::models::score::{ScoreComponent, ScoreResult};
use crate::signals::scoring::{band, bucket_below, Band};
use crate::signals::volume::VolumeSignal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TREND_FACTOR_MAX: f64 = 25.0;
const STREAK_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Alert priority for a risk band; SAFE positions only warrant INFO.
    pub fn priority(&self) -> AlertPriority {
        match self {
            RiskLevel::Safe => AlertPriority::Info,
            RiskLevel::Low => AlertPriority::Low,
            RiskLevel::Medium => AlertPriority::Medium,
            RiskLevel::High => AlertPriority::High,
            RiskLevel::Critical => AlertPriority::Critical,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "EXIT NOW - Very high risk",
            RiskLevel::High => "CONSIDER EXIT - High risk",
            RiskLevel::Medium => "WATCH CLOSELY - Moderate risk",
            RiskLevel::Low => "MONITOR - Low risk",
            RiskLevel::Safe => "SAFE - Very low risk",
        }
    }
}

const RISK_BANDS: [Band<RiskLevel>; 5] = [
    band(20.0, RiskLevel::Safe, 0.0),
    band(50.0, RiskLevel::Low, 0.0),
    band(70.0, RiskLevel::Medium, 0.0),
    band(80.0, RiskLevel::High, 0.0),
    band(f64::INFINITY, RiskLevel::Critical, 0.0),
];

const DISTANCE_BANDS: [Band<&str>; 4] = [
    band(1.0, "Very close to SL", 40.0),
    band(2.0, "Close to SL", 30.0),
    band(3.0, "Approaching SL", 15.0),
    band(f64::INFINITY, "", 0.0),
];

pub fn classify_risk(value: f64) -> RiskLevel {
    bucket_below(value, &RISK_BANDS)
        .map(|b| b.label)
        .unwrap_or(RiskLevel::Safe)
}

/// Score the risk of `position` hitting its stop loss.
pub fn score_sl_risk(
    position: &Position,
    snapshot: &IndicatorSnapshot,
    volume: &VolumeSignal,
) -> ScoreResult<RiskLevel> {
    let direction = position.direction;
    let components = vec![
        distance_factor(position, snapshot.price),
        trend_factor(direction, snapshot),
        macd_factor(direction, snapshot),
        rsi_factor(direction, &snapshot.rsi),
        streak_factor(direction, &snapshot.recent_closes),
        volume_factor(direction, snapshot, volume),
    ];

    let components: Vec<ScoreComponent> = components.into_iter().flatten().collect();
    let result = ScoreResult::from_components(components, classify_risk);
    debug!(
        ticker = %position.ticker,
        score = result.value,
        raw = result.raw_sum,
        classification = ?result.classification,
        "sl_risk: scored"
    );
    result
}

fn distance_factor(position: &Position, price: f64) -> Option<ScoreComponent> {
    let Some(pct) = math::pct_distance(price, position.stop_loss, price) else {
        return Some(ScoreComponent::new("Distance to SL", 0.0, "insufficient data (no price)"));
    };
    let row = bucket_below(pct, &DISTANCE_BANDS)?;
    (row.points > 0.0).then(|| {
        ScoreComponent::new(
            "Distance to SL",
            row.points,
            format!("{} ({:.1}% away)", row.label, pct),
        )
    })
}

fn trend_factor(direction: Direction, snapshot: &IndicatorSnapshot) -> Option<ScoreComponent> {
    let price = snapshot.price;
    let adverse = |ma: f64| match direction {
        Direction::Long => price < ma,
        Direction::Short => price > ma,
    };
    let side = match direction {
        Direction::Long => "Below",
        Direction::Short => "Above",
    };

    let mut points: f64 = 0.0;
    let mut reasons = Vec::new();
    let mut missing = Vec::new();
    for (name, reading, weight) in [
        ("EMA 9", &snapshot.ema9, 8.0),
        ("SMA 20", &snapshot.sma20, 10.0),
        ("SMA 50", &snapshot.sma50, 7.0),
    ] {
        match reading.get() {
            Some(ma) if adverse(ma) => {
                points += weight;
                reasons.push(format!("{} {}", side, name));
            }
            Some(_) => {}
            None => missing.push(name),
        }
    }

    if let (Some(sma20), Some(sma50)) = (snapshot.sma20.get(), snapshot.sma50.get()) {
        match direction {
            Direction::Long if sma20 < sma50 => {
                points += 5.0;
                reasons.push("Death cross forming".to_string());
            }
            Direction::Short if sma20 > sma50 => {
                points += 5.0;
                reasons.push("Golden cross forming".to_string());
            }
            _ => {}
        }
    }

    if points > 0.0 {
        return Some(ScoreComponent::new(
            "Trend",
            points.min(TREND_FACTOR_MAX),
            reasons.join(", "),
        ));
    }
    (!missing.is_empty()).then(|| {
        ScoreComponent::new("Trend", 0.0, format!("{}: insufficient data", missing.join(", ")))
    })
}

fn macd_factor(direction: Direction, snapshot: &IndicatorSnapshot) -> Option<ScoreComponent> {
    let Some(macd) = snapshot.macd.get() else {
        return Some(ScoreComponent::new("MACD", 0.0, snapshot.macd.unavailable_reason()));
    };
    let (against, worsening, against_text, worsening_text) = match direction {
        Direction::Long => (
            macd.is_bearish(),
            macd.histogram < macd.prev_histogram,
            "MACD bearish",
            "MACD declining",
        ),
        Direction::Short => (
            macd.is_bullish(),
            macd.histogram > macd.prev_histogram,
            "MACD bullish",
            "MACD rising",
        ),
    };

    let mut points = 0.0;
    let mut reasons = Vec::new();
    if against {
        points += 8.0;
        reasons.push(against_text);
    }
    if worsening {
        points += 7.0;
        reasons.push(worsening_text);
    }
    (points > 0.0).then(|| ScoreComponent::new("MACD", points, reasons.join(", ")))
}

fn rsi_factor(direction: Direction, rsi: &Reading<f64>) -> Option<ScoreComponent> {
    let Some(value) = rsi.get() else {
        return Some(ScoreComponent::new("RSI", 0.0, rsi.unavailable_reason()));
    };
    match direction {
        Direction::Long if value < 35.0 => Some(ScoreComponent::new(
            "RSI",
            10.0,
            format!("RSI weak ({:.0})", value),
        )),
        Direction::Short if value > 65.0 => Some(ScoreComponent::new(
            "RSI",
            10.0,
            format!("RSI strong ({:.0})", value),
        )),
        _ => None,
    }
}

fn streak_factor(direction: Direction, closes: &[f64]) -> Option<ScoreComponent> {
    if closes.len() < STREAK_LEN + 1 {
        return Some(ScoreComponent::new(
            "Candles",
            0.0,
            format!("insufficient data ({} of {} candles)", closes.len(), STREAK_LEN + 1),
        ));
    }
    let tail = &closes[closes.len() - (STREAK_LEN + 1)..];
    let against = tail.windows(2).all(|pair| match direction {
        Direction::Long => pair[1] < pair[0],
        Direction::Short => pair[1] > pair[0],
    });
    let colour = match direction {
        Direction::Long => "red",
        Direction::Short => "green",
    };
    against.then(|| {
        ScoreComponent::new(
            "Candles",
            10.0,
            format!("{} consecutive {} candles", STREAK_LEN, colour),
        )
    })
}

fn volume_factor(
    direction: Direction,
    snapshot: &IndicatorSnapshot,
    volume: &VolumeSignal,
) -> Option<ScoreComponent> {
    if !snapshot.avg_volume_20.is_available() {
        return Some(ScoreComponent::new(
            "Volume",
            0.0,
            snapshot.avg_volume_20.unavailable_reason(),
        ));
    }
    volume.is_strong_against(direction).then(|| {
        ScoreComponent::new(
            "Volume",
            10.0,
            format!("{} ({:.1}x)", volume.label, volume.ratio),
        )
    })
}
