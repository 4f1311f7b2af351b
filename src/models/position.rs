//! Open positions as supplied by the portfolio store.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for LONG, -1 for SHORT.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    /// `a` is more favorable than `b` for this direction.
    pub fn favors(&self, a: f64, b: f64) -> bool {
        match self {
            Direction::Long => a > b,
            Direction::Short => a < b,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("LONG"),
            Direction::Short => f.write_str("SHORT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum PositionError {
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("stop loss {stop_loss} is on the wrong side of entry {entry_price} for a {direction} position")]
    StopLossWrongSide {
        direction: Direction,
        entry_price: f64,
        stop_loss: f64,
    },

    #[error("{field} {value} is not beyond {reference} for a {direction} position")]
    TargetOrder {
        direction: Direction,
        field: &'static str,
        value: f64,
        reference: f64,
    },

    #[error("ticker must not be empty")]
    EmptyTicker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub direction: Direction,
    pub quantity: f64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub target1: f64,
    pub target2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target3: Option<f64>,
}

impl Position {
    /// Reject positions the scorers cannot reason about. Nothing is corrected.
    pub fn validate(&self) -> Result<(), PositionError> {
        if self.ticker.trim().is_empty() {
            return Err(PositionError::EmptyTicker);
        }
        check_positive("entry_price", self.entry_price)?;
        check_positive("quantity", self.quantity)?;
        check_positive("stop_loss", self.stop_loss)?;
        check_positive("target1", self.target1)?;
        check_positive("target2", self.target2)?;
        if let Some(target3) = self.target3 {
            check_positive("target3", target3)?;
        }

        // Breakeven (stop == entry) is allowed.
        if self.direction.favors(self.stop_loss, self.entry_price) {
            return Err(PositionError::StopLossWrongSide {
                direction: self.direction,
                entry_price: self.entry_price,
                stop_loss: self.stop_loss,
            });
        }

        let ladder = [
            ("target1", self.target1, self.entry_price),
            ("target2", self.target2, self.target1),
        ];
        for (field, value, reference) in ladder {
            self.check_beyond(field, value, reference)?;
        }
        if let Some(target3) = self.target3 {
            self.check_beyond("target3", target3, self.target2)?;
        }
        Ok(())
    }

    /// Signed P&L percentage relative to entry.
    pub fn pnl_pct(&self, current_price: f64) -> f64 {
        self.direction.sign() * (current_price - self.entry_price) / self.entry_price * 100.0
    }

    pub fn pnl_amount(&self, current_price: f64) -> f64 {
        self.direction.sign() * (current_price - self.entry_price) * self.quantity
    }

    pub fn invested(&self) -> f64 {
        self.entry_price * self.quantity
    }

    fn check_beyond(&self, field: &'static str, value: f64, reference: f64) -> Result<(), PositionError> {
        if self.direction.favors(value, reference) {
            Ok(())
        } else {
            Err(PositionError::TargetOrder {
                direction: self.direction,
                field,
                value,
                reference,
            })
        }
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), PositionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PositionError::NonPositive { field, value })
    }
}
