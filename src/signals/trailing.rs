//! Trailing stop advice from realized profit tiers.

use crate::models::position::Position;
use crate::signals::scoring::{band, bucket_below, Band};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailTier {
    Breakeven,
    SecureGains,
    LockProfits,
    LockMajorProfit,
}

impl fmt::Display for TrailTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrailTier::Breakeven => "BREAKEVEN",
            TrailTier::SecureGains => "SECURE_GAINS",
            TrailTier::LockProfits => "LOCK_PROFITS",
            TrailTier::LockMajorProfit => "LOCK_MAJOR_PROFIT",
        };
        f.write_str(s)
    }
}

/// Profit tiers; `points` holds the fraction of the open gain to lock.
const TIERS: [Band<Option<TrailTier>>; 6] = [
    band(2.0, None, 0.0),
    band(4.0, Some(TrailTier::Breakeven), 0.0),
    band(6.0, Some(TrailTier::SecureGains), 0.3),
    band(8.0, Some(TrailTier::SecureGains), 0.5),
    band(10.0, Some(TrailTier::LockProfits), 0.6),
    band(f64::INFINITY, Some(TrailTier::LockMajorProfit), 0.7),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailingAdvice {
    pub tier: TrailTier,
    pub profit_pct: f64,
    pub lock_fraction: f64,
    pub new_stop_loss: f64,
    pub current_stop_loss: f64,
}

impl TrailingAdvice {
    pub fn reason(&self) -> String {
        match self.tier {
            TrailTier::Breakeven => format!("Profit {:.1}%: move SL to breakeven", self.profit_pct),
            _ => format!(
                "Profit {:.1}%: lock {:.0}% of gains",
                self.profit_pct,
                self.lock_fraction * 100.0
            ),
        }
    }
}

/// Tier and lock fraction for a realized profit percentage.
pub fn trail_tier(profit_pct: f64) -> Option<(TrailTier, f64)> {
    let row = bucket_below(profit_pct, &TIERS)?;
    row.label.map(|tier| (tier, row.points))
}

/// Proposed stop for `position` at `current_price`, only when it tightens
/// the existing stop.
pub fn advise_trailing_stop(position: &Position, current_price: f64) -> Option<TrailingAdvice> {
    let profit_pct = position.pnl_pct(current_price);
    let (tier, lock_fraction) = trail_tier(profit_pct)?;

    // The lock applies to the signed move, so SHORT stops land below entry.
    let new_stop_loss = position.entry_price + lock_fraction * (current_price - position.entry_price);
    if !position.direction.favors(new_stop_loss, position.stop_loss) {
        return None;
    }

    Some(TrailingAdvice {
        tier,
        profit_pct,
        lock_fraction,
        new_stop_loss,
        current_stop_loss: position.stop_loss,
    })
}
