use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStrength {
    Weak,
    Moderate,
    Strong,
}

impl LevelStrength {
    pub fn from_touches(touch_count: u32) -> Self {
        match touch_count {
            0 | 1 => LevelStrength::Weak,
            2 => LevelStrength::Moderate,
            _ => LevelStrength::Strong,
        }
    }
}

/// Detection method that produced a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSource {
    Pivot,
    Cluster,
    Psychological,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub kind: LevelKind,
    pub strength: LevelStrength,
    pub touch_count: u32,
    /// Touches made on above-average volume.
    pub volume_confirmed: u32,
    pub source_method: LevelSource,
}

impl PriceLevel {
    pub fn new(price: f64, kind: LevelKind, touch_count: u32, source_method: LevelSource) -> Self {
        Self {
            price,
            kind,
            strength: LevelStrength::from_touches(touch_count),
            touch_count,
            volume_confirmed: 0,
            source_method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    /// All detected levels sorted by ascending price.
    pub levels: Vec<PriceLevel>,
    pub nearest_support: Option<PriceLevel>,
    pub nearest_resistance: Option<PriceLevel>,
    pub distance_to_support_pct: Option<f64>,
    pub distance_to_resistance_pct: Option<f64>,
}

impl SupportResistance {
    pub fn empty() -> Self {
        Self {
            levels: Vec::new(),
            nearest_support: None,
            nearest_resistance: None,
            distance_to_support_pct: None,
            distance_to_resistance_pct: None,
        }
    }
}
