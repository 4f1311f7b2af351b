//! Position analytics for open trades: indicators, risk and upside scoring,
//! trailing-stop and target advice, and prioritized alerts.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use config::{Config, EngineConfig};
pub use signals::engine::{evaluate_portfolio, evaluate_position, EvaluationRequest, PositionReport};
