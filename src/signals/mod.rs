//! Scorers, advisors and the position evaluator built on top of them.

pub mod engine;
pub mod momentum;
pub mod mtf;
pub mod scoring;
pub mod sl_risk;
pub mod targets;
pub mod trailing;
pub mod upside;
pub mod volume;

pub use engine::{
    detect_trend_reversal, evaluate_portfolio, evaluate_position, EngineError, EvaluationRequest,
    OverallStatus, PortfolioReport, PortfolioSummary, PositionFailure, PositionReport,
    PositionState, Recommendation, TrendReversal,
};
pub use momentum::{score_momentum, MomentumClass};
pub use mtf::{align_timeframes, evaluate_timeframe, AlignmentClass, MtfAlignment, TimeframeTrend};
pub use scoring::{band, bucket_above, bucket_below, scale_linear, Band};
pub use sl_risk::{score_sl_risk, RiskLevel};
pub use targets::{calculate_targets, DynamicTargets};
pub use trailing::{advise_trailing_stop, trail_tier, TrailTier, TrailingAdvice};
pub use upside::{score_upside, UpsideClass};
pub use volume::{classify_volume, VolumeLabel, VolumeSignal, VolumeStrength};
