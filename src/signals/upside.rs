//! Upside potential once target1 has been reached: hold for more, take
//! part of the position off, or exit.
//!
//! SHORT positions are scored on mirrored momentum and RSI so the same
//! thresholds apply to both directions.

use crate::common::math;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::position::Direction;
use crate::models::score::{ScoreComponent, ScoreResult};
use crate::signals::momentum::MomentumClass;
use crate::signals::scoring::{band, bucket_below, Band};
use crate::signals::targets::DynamicTargets;
use crate::signals::volume::{VolumeSignal, VolumeStrength};
use serde::{Deserialize, Serialize};

pub const BASELINE: f64 = 50.0;
const PROJECTED_GAIN_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpsideClass {
    Hold,
    PartialExit,
    Exit,
}

impl UpsideClass {
    pub fn recommendation(&self) -> &'static str {
        match self {
            UpsideClass::Hold => "HOLD - strong upside potential, trail the stop",
            UpsideClass::PartialExit => "PARTIAL EXIT - book 50%, trail the rest",
            UpsideClass::Exit => "EXIT - book full profit",
        }
    }
}

const UPSIDE_BANDS: [Band<UpsideClass>; 3] = [
    band(50.0, UpsideClass::Exit, 0.0),
    band(70.0, UpsideClass::PartialExit, 0.0),
    band(f64::INFINITY, UpsideClass::Hold, 0.0),
];

pub fn classify_upside(value: f64) -> UpsideClass {
    bucket_below(value, &UPSIDE_BANDS)
        .map(|b| b.label)
        .unwrap_or(UpsideClass::Exit)
}

/// Score the upside left in a position that has reached target1.
///
/// `projected` are targets recomputed on the current price.
pub fn score_upside(
    direction: Direction,
    snapshot: &IndicatorSnapshot,
    momentum: &ScoreResult<MomentumClass>,
    volume: &VolumeSignal,
    projected: &DynamicTargets,
) -> ScoreResult<UpsideClass> {
    let mirror = |v: f64| match direction {
        Direction::Long => v,
        Direction::Short => 100.0 - v,
    };

    let mut components = vec![ScoreComponent::new("Baseline", BASELINE, "neutral starting point")];

    let momentum_value = mirror(momentum.value);
    let momentum_points = if momentum_value >= 70.0 {
        25.0
    } else if momentum_value >= 55.0 {
        15.0
    } else if momentum_value <= 40.0 {
        -20.0
    } else {
        0.0
    };
    components.push(ScoreComponent::new(
        "Momentum",
        momentum_points,
        format!("momentum {:.0} ({})", momentum.value, momentum.classification),
    ));

    components.push(match snapshot.rsi.get().map(mirror) {
        Some(rsi) if rsi < 60.0 => ScoreComponent::new("RSI headroom", 15.0, "RSI has room to run"),
        Some(rsi) if rsi > 75.0 => ScoreComponent::new("RSI headroom", -25.0, "RSI overbought"),
        Some(_) => ScoreComponent::new("RSI headroom", 0.0, "RSI elevated"),
        None => ScoreComponent::new("RSI headroom", 0.0, snapshot.rsi.unavailable_reason()),
    });

    let volume_component = if !snapshot.avg_volume_20.is_available() {
        ScoreComponent::new("Volume", 0.0, snapshot.avg_volume_20.unavailable_reason())
    } else if volume.is_strong_with(direction) {
        ScoreComponent::new("Volume", 15.0, volume.description.clone())
    } else if volume.strength == VolumeStrength::Weak {
        ScoreComponent::new("Volume", -10.0, volume.description.clone())
    } else {
        ScoreComponent::new("Volume", 0.0, volume.description.clone())
    };
    components.push(volume_component);

    components.push(bollinger_component(direction, snapshot));

    let target = projected.next_target(direction);
    let gain = math::pct_change(snapshot.price, target)
        .map(|pct| direction.sign() * pct)
        .unwrap_or(0.0);
    let gain_points = if gain > PROJECTED_GAIN_PCT { 10.0 } else { 0.0 };
    components.push(ScoreComponent::new(
        "Projected gain",
        gain_points,
        format!("next target {:.2} ({:+.1}%)", target, gain),
    ));

    ScoreResult::from_components(components, classify_upside)
}

fn bollinger_component(direction: Direction, snapshot: &IndicatorSnapshot) -> ScoreComponent {
    let Some(bands) = snapshot.bollinger.get() else {
        return ScoreComponent::new("Bollinger", 0.0, snapshot.bollinger.unavailable_reason());
    };
    let Some(position) = bands.position(snapshot.price) else {
        return ScoreComponent::new("Bollinger", 0.0, "insufficient data (flat bands)");
    };
    let price = snapshot.price;
    let (room, stretched) = match direction {
        Direction::Long => (position < 0.7, price >= bands.upper),
        Direction::Short => (position > 0.3, price <= bands.lower),
    };
    if stretched {
        ScoreComponent::new("Bollinger", -15.0, "price at the outer band")
    } else if room {
        ScoreComponent::new(
            "Bollinger",
            10.0,
            format!("room inside the bands ({:.0}%)", position * 100.0),
        )
    } else {
        ScoreComponent::new("Bollinger", 0.0, format!("near the outer band ({:.0}%)", position * 100.0))
    }
}
