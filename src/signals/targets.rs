//! ATR-based profit targets with a percentage fallback.

use crate::models::indicators::Reading;
use crate::models::levels::{LevelKind, PriceLevel, SupportResistance};
use crate::models::position::Direction;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ATR_MULTIPLIERS: [f64; 3] = [1.5, 3.0, 5.0];
/// Percentage ladder used when ATR is unavailable.
pub const FALLBACK_PCTS: [f64; 3] = [3.0, 6.0, 10.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicTargets {
    pub target1: f64,
    pub target2: f64,
    pub target3: f64,
    pub uncapped_target3: f64,
    /// Level that pulled target3 in, if any.
    pub capped_by: Option<PriceLevel>,
    pub atr: Option<f64>,
    /// Computed from the percentage ladder instead of ATR.
    pub degraded: bool,
}

impl DynamicTargets {
    /// Most conservative of the outer targets; target3 may sit inside
    /// target2 after capping.
    pub fn next_target(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Long => self.target2.min(self.target3),
            Direction::Short => self.target2.max(self.target3),
        }
    }
}

pub fn calculate_targets(
    direction: Direction,
    price: f64,
    atr: &Reading<f64>,
    levels: &SupportResistance,
) -> DynamicTargets {
    let sign = direction.sign();
    let usable_atr = atr.get().filter(|a| a.is_finite() && *a > 0.0);

    let [t1, t2, t3] = match usable_atr {
        Some(atr) => ATR_MULTIPLIERS.map(|m| price + sign * atr * m),
        None => {
            debug!(
                reason = %atr.unavailable_reason(),
                "targets: atr unavailable, using percentage ladder"
            );
            FALLBACK_PCTS.map(|pct| price * (1.0 + sign * pct / 100.0))
        }
    };

    let capped_by = capping_level(direction, price, t3, levels);
    let target3 = match (&capped_by, direction) {
        (Some(level), Direction::Long) => t3.min(level.price),
        (Some(level), Direction::Short) => t3.max(level.price),
        (None, _) => t3,
    };

    DynamicTargets {
        target1: t1,
        target2: t2,
        target3,
        uncapped_target3: t3,
        capped_by,
        atr: usable_atr,
        degraded: usable_atr.is_none(),
    }
}

/// Nearest level confirmed by price action strictly between `price` and
/// `target3`. Zero-touch psychological levels never cap.
fn capping_level(
    direction: Direction,
    price: f64,
    target3: f64,
    levels: &SupportResistance,
) -> Option<PriceLevel> {
    let mut confirmed = levels.levels.iter().filter(|level| level.touch_count > 0);
    match direction {
        Direction::Long => confirmed
            .find(|level| {
                level.kind == LevelKind::Resistance && level.price > price && level.price < target3
            })
            .copied(),
        Direction::Short => confirmed
            .rev()
            .find(|level| {
                level.kind == LevelKind::Support && level.price < price && level.price > target3
            })
            .copied(),
    }
}
