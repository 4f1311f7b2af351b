use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One OHLCV bar. Series are chronological and never mutated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Candle interval of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Weekly,
    Hourly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Hourly => "hourly",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of an indicator that may be unavailable on short or degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reading<T> {
    Available { value: T },
    NotEnoughData { required: usize, available: usize },
    Degenerate,
}

impl<T> Reading<T> {
    pub fn available(value: T) -> Self {
        Reading::Available { value }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Available { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Available { .. })
    }

    /// Short rationale used when a dependent factor scores zero.
    pub fn unavailable_reason(&self) -> String {
        match self {
            Reading::Available { .. } => String::new(),
            Reading::NotEnoughData {
                required,
                available,
            } => format!("insufficient data ({} of {} candles)", available, required),
            Reading::Degenerate => "insufficient data (degenerate input)".to_string(),
        }
    }
}

impl<T: Copy> Reading<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub prev_histogram: f64,
}

impl MacdIndicator {
    pub fn is_bullish(&self) -> bool {
        self.histogram > 0.0
    }

    pub fn is_bearish(&self) -> bool {
        self.histogram < 0.0
    }

    /// Histogram magnitude grew versus the previous bar.
    pub fn is_expanding(&self) -> bool {
        self.histogram.abs() > self.prev_histogram.abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Position of `price` inside the bands, 0 at the lower band and 1 at
    /// the upper band. `None` when the bands have collapsed.
    pub fn position(&self, price: f64) -> Option<f64> {
        let width = self.upper - self.lower;
        if width <= 0.0 || !width.is_finite() {
            return None;
        }
        Some((price - self.lower) / width)
    }
}

/// Indicator values for the latest candle of a series plus the short
/// trailing windows needed by streak and cross checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub prev_close: Option<f64>,
    pub volume: f64,
    pub rsi: Reading<f64>,
    pub macd: Reading<MacdIndicator>,
    pub ema9: Reading<f64>,
    pub ema21: Reading<f64>,
    pub sma20: Reading<f64>,
    pub sma50: Reading<f64>,
    pub atr: Reading<f64>,
    pub bollinger: Reading<BollingerBands>,
    pub avg_volume_20: Reading<f64>,
    pub avg_volume_5: Reading<f64>,
    pub return_5d: Reading<f64>,
    /// Last closes, oldest first (up to 5).
    pub recent_closes: Vec<f64>,
}

impl IndicatorSnapshot {
    /// Close-to-close change of the latest candle.
    pub fn last_change(&self) -> Option<f64> {
        self.prev_close.map(|prev| self.price - prev)
    }
}
