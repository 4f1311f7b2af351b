//! Volume classification: current volume versus the 20-candle average,
//! combined with the direction of the latest close-to-close move.

use crate::models::indicators::IndicatorSnapshot;
use crate::models::position::Direction;
use crate::signals::scoring::{band, bucket_above, Band};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStrength {
    Strong,
    Normal,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pressure {
    Buying,
    Selling,
    /// Unchanged close, or no previous candle.
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeLabel {
    StrongBuying,
    Buying,
    WeakBuying,
    StrongSelling,
    Selling,
    WeakSelling,
    Neutral,
}

impl fmt::Display for VolumeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolumeLabel::StrongBuying => "STRONG_BUYING",
            VolumeLabel::Buying => "BUYING",
            VolumeLabel::WeakBuying => "WEAK_BUYING",
            VolumeLabel::StrongSelling => "STRONG_SELLING",
            VolumeLabel::Selling => "SELLING",
            VolumeLabel::WeakSelling => "WEAK_SELLING",
            VolumeLabel::Neutral => "NEUTRAL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSignal {
    pub label: VolumeLabel,
    pub strength: VolumeStrength,
    pub pressure: Pressure,
    pub ratio: f64,
    pub trend: Option<VolumeTrend>,
    pub description: String,
}

impl VolumeSignal {
    /// Strong volume pushing against `direction`.
    pub fn is_strong_against(&self, direction: Direction) -> bool {
        self.strength == VolumeStrength::Strong && self.pressure == adverse_pressure(direction)
    }

    /// Strong volume pushing with `direction`.
    pub fn is_strong_with(&self, direction: Direction) -> bool {
        self.strength == VolumeStrength::Strong && self.pressure == favorable_pressure(direction)
    }
}

const RATIO_BANDS: [Band<VolumeStrength>; 3] = [
    band(1.5, VolumeStrength::Strong, 0.0),
    band(1.0, VolumeStrength::Normal, 0.0),
    band(f64::NEG_INFINITY, VolumeStrength::Weak, 0.0),
];

/// Classify the latest candle's volume.
///
/// A missing or zero average gives `ratio = 0` and a weak classification.
pub fn classify_volume(snapshot: &IndicatorSnapshot) -> VolumeSignal {
    let ratio = match snapshot.avg_volume_20.get() {
        Some(avg) if avg > 0.0 && snapshot.volume.is_finite() => snapshot.volume / avg,
        _ => 0.0,
    };
    let strength = bucket_above(ratio, &RATIO_BANDS)
        .map(|b| b.label)
        .unwrap_or(VolumeStrength::Weak);

    let pressure = match snapshot.last_change() {
        Some(change) if change > 0.0 => Pressure::Buying,
        Some(change) if change < 0.0 => Pressure::Selling,
        _ => Pressure::Flat,
    };

    let label = match (pressure, strength) {
        (Pressure::Buying, VolumeStrength::Strong) => VolumeLabel::StrongBuying,
        (Pressure::Buying, VolumeStrength::Normal) => VolumeLabel::Buying,
        (Pressure::Buying, VolumeStrength::Weak) => VolumeLabel::WeakBuying,
        (Pressure::Selling, VolumeStrength::Strong) => VolumeLabel::StrongSelling,
        (Pressure::Selling, VolumeStrength::Normal) => VolumeLabel::Selling,
        (Pressure::Selling, VolumeStrength::Weak) => VolumeLabel::WeakSelling,
        (Pressure::Flat, _) => VolumeLabel::Neutral,
    };

    let trend = match (snapshot.avg_volume_5.get(), snapshot.avg_volume_20.get()) {
        (Some(short), Some(long)) if short > long => Some(VolumeTrend::Increasing),
        (Some(_), Some(_)) => Some(VolumeTrend::Decreasing),
        _ => None,
    };

    let description = match label {
        VolumeLabel::StrongBuying => format!("Strong buying pressure ({:.1}x avg volume)", ratio),
        VolumeLabel::Buying => format!("Buying with good volume ({:.1}x)", ratio),
        VolumeLabel::WeakBuying => format!("Weak rally, low volume ({:.1}x)", ratio),
        VolumeLabel::StrongSelling => format!("Strong selling pressure ({:.1}x avg volume)", ratio),
        VolumeLabel::Selling => format!("Selling with volume ({:.1}x)", ratio),
        VolumeLabel::WeakSelling => format!("Weak decline, low volume ({:.1}x)", ratio),
        VolumeLabel::Neutral => format!("No price change ({:.1}x volume)", ratio),
    };

    VolumeSignal {
        label,
        strength,
        pressure,
        ratio,
        trend,
        description,
    }
}

fn adverse_pressure(direction: Direction) -> Pressure {
    match direction {
        Direction::Long => Pressure::Selling,
        Direction::Short => Pressure::Buying,
    }
}

fn favorable_pressure(direction: Direction) -> Pressure {
    match direction {
        Direction::Long => Pressure::Buying,
        Direction::Short => Pressure::Selling,
    }
}
