//! Position evaluation: runs every analyzer over the supplied candle series
//! and aggregates their verdicts into an ordered alert list.
//!
//! Evaluation is pure. The same request and config always produce the same
//! report, so callers are free to memoize or parallelize.

use crate::config::EngineConfig;
use crate::indicators::compute_snapshot;
use crate::indicators::structure::calculate_support_resistance;
use crate::models::alert::{sort_alerts, Alert, AlertKind, AlertPriority};
use crate::models::indicators::{Candle, IndicatorSnapshot, Timeframe};
use crate::models::levels::SupportResistance;
use crate::models::position::{Direction, Position, PositionError};
use crate::models::score::ScoreResult;
use crate::signals::momentum::{score_momentum, MomentumClass};
use crate::signals::mtf::{align_timeframes, MtfAlignment};
use crate::signals::sl_risk::{score_sl_risk, RiskLevel};
use crate::signals::targets::{calculate_targets, DynamicTargets};
use crate::signals::trailing::{advise_trailing_stop, TrailTier, TrailingAdvice};
use crate::signals::upside::{score_upside, UpsideClass};
use crate::signals::volume::{classify_volume, VolumeSignal};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Reversal signal weight at which a reversal is flagged as likely.
const REVERSAL_THRESHOLD: u8 = 3;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineError {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),

    #[error("no daily candles for {ticker}")]
    EmptyHistory { ticker: String },
}

/// Everything needed to evaluate one position. Series are chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub position: Position,
    pub daily: Vec<Candle>,
    #[serde(default)]
    pub weekly: Option<Vec<Candle>>,
    /// Only supplied while the market is open.
    #[serde(default)]
    pub hourly: Option<Vec<Candle>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionState {
    pub sl_hit: bool,
    pub target1_hit: bool,
    pub target2_hit: bool,
    pub target3_hit: bool,
}

impl PositionState {
    pub fn at(position: &Position, price: f64) -> Self {
        let direction = position.direction;
        // Touching a level counts as reaching it.
        let reached = |level: f64| !direction.favors(level, price);
        Self {
            sl_hit: !direction.favors(price, position.stop_loss),
            target1_hit: reached(position.target1),
            target2_hit: reached(position.target2),
            target3_hit: position.target3.is_some_and(reached),
        }
    }

    pub fn any_target_hit(&self) -> bool {
        self.target1_hit || self.target2_hit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Critical,
    Warning,
    Success,
    Opportunity,
    Good,
    Ok,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    pub new_stop_loss: Option<f64>,
    pub new_target: Option<f64>,
}

/// Informational count of signals that usually precede a trend turning
/// against the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReversal {
    pub score: u8,
    pub signals: Vec<String>,
    pub likely: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub ticker: String,
    pub direction: Direction,
    pub current_price: f64,
    pub pnl_pct: f64,
    pub pnl_amount: f64,
    pub indicators: IndicatorSnapshot,
    pub levels: SupportResistance,
    pub volume: VolumeSignal,
    pub momentum: ScoreResult<MomentumClass>,
    pub sl_risk: Option<ScoreResult<RiskLevel>>,
    pub upside: Option<ScoreResult<UpsideClass>>,
    pub targets: DynamicTargets,
    pub trailing: Option<TrailingAdvice>,
    pub mtf: MtfAlignment,
    pub state: PositionState,
    pub trend_reversal: TrendReversal,
    pub alerts: Vec<Alert>,
    pub overall_status: OverallStatus,
    pub recommendation: Recommendation,
}

impl PositionReport {
    pub fn highest_priority(&self) -> Option<AlertPriority> {
        self.alerts.first().map(|alert| alert.priority)
    }
}

/// Evaluate one position against its candle history.
pub fn evaluate_position(
    request: &EvaluationRequest,
    config: &EngineConfig,
) -> Result<PositionReport, EngineError> {
    let position = &request.position;
    position.validate()?;

    let snapshot = compute_snapshot(&request.daily).ok_or_else(|| EngineError::EmptyHistory {
        ticker: position.ticker.clone(),
    })?;
    if !snapshot.is_complete() {
        debug!(
            ticker = %position.ticker,
            candles = request.daily.len(),
            "engine: evaluating with degraded indicators"
        );
    }
    let price = snapshot.price;
    let direction = position.direction;

    let state = PositionState::at(position, price);
    let levels = calculate_support_resistance(&request.daily, config.sr_lookback);
    let volume = classify_volume(&snapshot);
    let momentum = score_momentum(&snapshot);
    let targets = calculate_targets(direction, price, &snapshot.atr, &levels);
    let mtf = align_timeframes(
        direction,
        &[
            (Timeframe::Daily, Some(request.daily.as_slice())),
            (Timeframe::Weekly, request.weekly.as_deref()),
            (Timeframe::Hourly, request.hourly.as_deref()),
        ],
    );
    let trend_reversal = detect_trend_reversal(direction, &snapshot);
    let pnl_pct = position.pnl_pct(price);

    let mut alerts = Vec::new();
    let mut sl_risk = None;
    let mut upside = None;
    let mut trailing = None;
    let mut recommendation = Recommendation::default();

    if state.sl_hit {
        alerts.push(
            Alert::new(
                AlertPriority::Critical,
                AlertKind::StopLossHit,
                format!("Price {:.2} breached SL {:.2}", price, position.stop_loss),
                "EXIT IMMEDIATELY",
            )
            .with_score("sl_hit", 100.0),
        );
    } else {
        if state.target2_hit {
            alerts.push(
                Alert::new(
                    AlertPriority::Critical,
                    AlertKind::BookFullProfits,
                    format!("Both targets achieved! P&L: {:+.2}%", pnl_pct),
                    "BOOK FULL PROFITS",
                )
                .with_score("pnl_pct", pnl_pct),
            );
        } else if state.target1_hit {
            let score = score_upside(direction, &snapshot, &momentum, &volume, &targets);
            let alert = upside_alert(&score, &targets, direction);
            if alert.kind == AlertKind::TargetHold {
                recommendation.new_target = Some(targets.next_target(direction));
            }
            alerts.push(alert);
            upside = Some(score);
        } else {
            let score = score_sl_risk(position, &snapshot, &volume);
            if score.value >= config.sl_risk_alert_threshold && score.classification != RiskLevel::Safe {
                alerts.push(
                    Alert::new(
                        score.classification.priority(),
                        AlertKind::SlRisk,
                        format!("Risk Score: {:.0} - {}", score.value, score.summary(usize::MAX)),
                        score.classification.recommendation(),
                    )
                    .with_score("sl_risk", score.value),
                );
            }
            sl_risk = Some(score);
        }

        trailing = advise_trailing_stop(position, price)
            .filter(|advice| advice.profit_pct >= config.trail_after_profit_pct);
        if let Some(advice) = &trailing {
            let priority = if advice.tier == TrailTier::LockMajorProfit {
                AlertPriority::High
            } else {
                AlertPriority::Medium
            };
            alerts.push(
                Alert::new(
                    priority,
                    AlertKind::TrailStop,
                    format!(
                        "{}. Move SL from {:.2} to {:.2}",
                        advice.reason(),
                        position.stop_loss,
                        advice.new_stop_loss
                    ),
                    format!("New SL: {:.2}", advice.new_stop_loss),
                )
                .with_score("profit_pct", advice.profit_pct),
            );
            recommendation.new_stop_loss = Some(advice.new_stop_loss);
        }

        if let Some(alignment) = mtf.alignment_pct() {
            if alignment < config.mtf_warning_alignment_pct && pnl_pct < 0.0 {
                alerts.push(
                    Alert::new(
                        AlertPriority::Medium,
                        AlertKind::MtfWarning,
                        format!(
                            "Only {:.0}% of {} timeframes agree with the {} position",
                            alignment,
                            mtf.timeframes.len(),
                            direction
                        ),
                        "REVIEW POSITION",
                    )
                    .with_score("mtf_alignment", alignment),
                );
            }
        }

        if volume.is_strong_against(direction) {
            alerts.push(
                Alert::new(
                    AlertPriority::Low,
                    AlertKind::VolumeWarning,
                    volume.description.clone(),
                    "WATCH VOLUME",
                )
                .with_score("volume_ratio", volume.ratio),
            );
        }
    }

    sort_alerts(&mut alerts);

    let overall_status = overall_status(&state, sl_risk.as_ref(), upside.as_ref(), trailing.as_ref());
    if !alerts.is_empty() {
        info!(
            ticker = %position.ticker,
            alerts = alerts.len(),
            top = %alerts[0].kind,
            status = ?overall_status,
            "engine: alerts emitted"
        );
    } else {
        debug!(ticker = %position.ticker, status = ?overall_status, "engine: no alerts");
    }

    Ok(PositionReport {
        ticker: position.ticker.clone(),
        direction,
        current_price: price,
        pnl_pct,
        pnl_amount: position.pnl_amount(price),
        indicators: snapshot,
        levels,
        volume,
        momentum,
        sl_risk,
        upside,
        targets,
        trailing,
        mtf,
        state,
        trend_reversal,
        alerts,
        overall_status,
        recommendation,
    })
}

fn upside_alert(score: &ScoreResult<UpsideClass>, targets: &DynamicTargets, direction: Direction) -> Alert {
    let detail = score.summary(2);
    let alert = if score.value >= 70.0 {
        Alert::new(
            AlertPriority::Info,
            AlertKind::TargetHold,
            format!("Upside Score: {:.0} - {}", score.value, detail),
            format!("HOLD - new target {:.2}", targets.next_target(direction)),
        )
    } else if score.value >= 40.0 {
        Alert::new(
            AlertPriority::Medium,
            AlertKind::PartialExit,
            format!("Upside Score: {:.0} - {}", score.value, detail),
            "BOOK 50% PROFITS",
        )
    } else {
        Alert::new(
            AlertPriority::High,
            AlertKind::BookProfits,
            format!("Limited upside ({:.0}). Book profits.", score.value),
            "BOOK PROFITS",
        )
    };
    alert.with_score("upside", score.value)
}

fn overall_status(
    state: &PositionState,
    sl_risk: Option<&ScoreResult<RiskLevel>>,
    upside: Option<&ScoreResult<UpsideClass>>,
    trailing: Option<&TrailingAdvice>,
) -> OverallStatus {
    if state.sl_hit {
        return OverallStatus::Critical;
    }
    if let Some(risk) = sl_risk {
        if risk.value >= 70.0 {
            return OverallStatus::Critical;
        }
        if risk.value >= 50.0 {
            return OverallStatus::Warning;
        }
    }
    if state.target2_hit {
        return OverallStatus::Success;
    }
    if let Some(upside) = upside {
        return if upside.value >= 70.0 {
            OverallStatus::Opportunity
        } else {
            OverallStatus::Success
        };
    }
    if trailing.is_some() {
        return OverallStatus::Good;
    }
    OverallStatus::Ok
}

/// Weighted count of reversal signals on the daily series.
pub fn detect_trend_reversal(direction: Direction, snapshot: &IndicatorSnapshot) -> TrendReversal {
    let price = snapshot.price;
    let mut score = 0;
    let mut signals = Vec::new();
    let mut flag = |hit: bool, weight: u8, text: &str| {
        if hit {
            score += weight;
            signals.push(text.to_string());
        }
    };

    let rsi = snapshot.rsi.get();
    let macd = snapshot.macd.get();
    let ema9 = snapshot.ema9.get();
    let sma20 = snapshot.sma20.get();
    match direction {
        Direction::Long => {
            flag(rsi.is_some_and(|v| v > 70.0), 1, "RSI overbought");
            flag(
                macd.is_some_and(|m| m.is_bearish() && m.histogram < m.prev_histogram),
                1,
                "MACD bearish",
            );
            flag(ema9.is_some_and(|ma| price < ma), 1, "Below EMA 9");
            flag(sma20.is_some_and(|ma| price < ma), 2, "Below SMA 20");
        }
        Direction::Short => {
            flag(rsi.is_some_and(|v| v < 30.0), 1, "RSI oversold");
            flag(
                macd.is_some_and(|m| m.is_bullish() && m.histogram > m.prev_histogram),
                1,
                "MACD bullish",
            );
            flag(ema9.is_some_and(|ma| price > ma), 1, "Above EMA 9");
            flag(sma20.is_some_and(|ma| price > ma), 2, "Above SMA 20");
        }
    }

    TrendReversal {
        score,
        likely: score >= REVERSAL_THRESHOLD,
        signals,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFailure {
    pub ticker: String,
    pub error: EngineError,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub positions: usize,
    pub total_invested: f64,
    pub total_pnl_amount: f64,
    pub total_pnl_pct: f64,
    pub winners: usize,
    pub losers: usize,
    pub critical_alerts: usize,
    pub high_alerts: usize,
    pub sl_hit: usize,
    pub target_hit: usize,
}

impl PortfolioSummary {
    pub fn from_reports(reports: &[PositionReport], invested: f64) -> Self {
        let total_pnl_amount: f64 = reports.iter().map(|r| r.pnl_amount).sum();
        let count_alerts = |priority: AlertPriority| {
            reports
                .iter()
                .flat_map(|r| r.alerts.iter())
                .filter(|a| a.priority == priority)
                .count()
        };
        Self {
            positions: reports.len(),
            total_invested: invested,
            total_pnl_amount,
            total_pnl_pct: if invested > 0.0 {
                total_pnl_amount / invested * 100.0
            } else {
                0.0
            },
            winners: reports.iter().filter(|r| r.pnl_amount > 0.0).count(),
            losers: reports.iter().filter(|r| r.pnl_amount < 0.0).count(),
            critical_alerts: count_alerts(AlertPriority::Critical),
            high_alerts: count_alerts(AlertPriority::High),
            sl_hit: reports.iter().filter(|r| r.state.sl_hit).count(),
            target_hit: reports.iter().filter(|r| r.state.any_target_hit()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub reports: Vec<PositionReport>,
    pub failures: Vec<PositionFailure>,
    pub summary: PortfolioSummary,
}

/// Evaluate every request independently. A rejected position is reported
/// under `failures` and does not stop the batch.
pub fn evaluate_portfolio(requests: &[EvaluationRequest], config: &EngineConfig) -> PortfolioReport {
    let mut reports = Vec::with_capacity(requests.len());
    let mut failures = Vec::new();
    let mut invested = 0.0;

    for request in requests {
        match evaluate_position(request, config) {
            Ok(report) => {
                invested += request.position.invested();
                reports.push(report);
            }
            Err(error) => {
                debug!(ticker = %request.position.ticker, error = %error, "engine: position rejected");
                failures.push(PositionFailure {
                    ticker: request.position.ticker.clone(),
                    error,
                });
            }
        }
    }

    let summary = PortfolioSummary::from_reports(&reports, invested);
    PortfolioReport {
        reports,
        failures,
        summary,
    }
}
