//! Shared data models spanning the engine layers.

pub mod alert;
pub mod indicators;
pub mod levels;
pub mod position;
pub mod score;

pub use alert::{sort_alerts, Alert, AlertKind, AlertPriority, SupportingScore};
pub use indicators::{
    BollingerBands, Candle, IndicatorSnapshot, MacdIndicator, Reading, RsiIndicator, Timeframe,
};
pub use levels::{LevelKind, LevelSource, LevelStrength, PriceLevel, SupportResistance};
pub use position::{Direction, Position, PositionError};
pub use score::{clamp_score, ScoreComponent, ScoreResult};
