//! Unit tests for position evaluation and alert aggregation

use crate::fixtures::{assert_close, candles_from_closes, decline, geometric, long, short};
use posguard::config::EngineConfig;
use posguard::models::alert::{AlertKind, AlertPriority};
use posguard::models::indicators::{Candle, Timeframe};
use posguard::models::position::Position;
use posguard::signals::engine::{
    evaluate_portfolio, evaluate_position, EngineError, EvaluationRequest, OverallStatus,
};

fn request(position: Position, daily: Vec<Candle>) -> EvaluationRequest {
    EvaluationRequest {
        position,
        daily,
        weekly: None,
        hourly: None,
    }
}

/// 59 flat closes at `base` followed by one close at `last`.
fn settles_at(base: f64, last: f64) -> Vec<Candle> {
    let mut closes = vec![base; 59];
    closes.push(last);
    candles_from_closes(&closes)
}

/// LONG sliding into its stop: accelerating decline ending near 65.8 with
/// the stop at 65 and a heavy selling candle last.
fn sliding_long() -> EvaluationRequest {
    let mut daily = decline(60, 100.0, 1.005);
    if let Some(last) = daily.last_mut() {
        last.volume = 3000.0;
    }
    request(long(70.0, 65.0, 80.0, 90.0), daily)
}

/// LONG up about 7.4% on a steady climb, nowhere near its targets.
fn trailing_long() -> EvaluationRequest {
    request(long(100.0, 95.0, 120.0, 140.0), geometric(60, 80.0, 1.005))
}

#[test]
fn test_stop_loss_hit_short_circuits() {
    let report = evaluate_position(
        &request(long(1500.0, 1500.0, 1600.0, 1700.0), settles_at(1500.0, 1495.0)),
        &EngineConfig::default(),
    )
    .unwrap();

    assert!(report.state.sl_hit);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, AlertKind::StopLossHit);
    assert_eq!(report.alerts[0].priority, AlertPriority::Critical);
    assert_eq!(report.alerts[0].driving_score(), 100.0);
    assert!(report.sl_risk.is_none());
    assert!(report.trailing.is_none());
    assert_eq!(report.overall_status, OverallStatus::Critical);
}

#[test]
fn test_price_on_stop_counts_as_hit() {
    let report = evaluate_position(
        &request(long(1500.0, 1490.0, 1600.0, 1700.0), settles_at(1500.0, 1490.0)),
        &EngineConfig::default(),
    )
    .unwrap();
    assert!(report.state.sl_hit);

    let report = evaluate_position(
        &request(short(100.0, 104.0, 95.0, 90.0), settles_at(100.0, 104.0)),
        &EngineConfig::default(),
    )
    .unwrap();
    assert!(report.state.sl_hit);
}

#[test]
fn test_second_target_books_full_profits() {
    let report = evaluate_position(
        &request(long(100.0, 95.0, 105.0, 110.0), settles_at(100.0, 112.0)),
        &EngineConfig::default(),
    )
    .unwrap();

    assert!(report.state.target1_hit && report.state.target2_hit);
    assert_eq!(report.alerts[0].kind, AlertKind::BookFullProfits);
    assert_eq!(report.alerts[0].priority, AlertPriority::Critical);
    assert!(report.upside.is_none());
    assert!(report.sl_risk.is_none());
    assert_eq!(report.overall_status, OverallStatus::Success);
    assert!(report.alerts.iter().any(|a| a.kind == AlertKind::TrailStop));
}

#[test]
fn test_first_target_runs_upside_instead_of_risk() {
    let report = evaluate_position(
        &request(long(100.0, 95.0, 105.0, 115.0), settles_at(100.0, 106.0)),
        &EngineConfig::default(),
    )
    .unwrap();

    assert!(report.state.target1_hit);
    assert!(!report.state.target2_hit);
    assert!(report.upside.is_some());
    assert!(report.sl_risk.is_none());
    assert!(report.alerts.iter().any(|a| a.kind.is_target()));
    assert!(matches!(
        report.overall_status,
        OverallStatus::Opportunity | OverallStatus::Success
    ));
}

#[test]
fn test_invalid_position_is_rejected() {
    let err = evaluate_position(
        &request(long(100.0, 105.0, 110.0, 120.0), settles_at(100.0, 100.0)),
        &EngineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPosition(_)));
}

#[test]
fn test_empty_history_is_rejected() {
    let err = evaluate_position(
        &request(long(100.0, 95.0, 110.0, 120.0), Vec::new()),
        &EngineConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        EngineError::EmptyHistory {
            ticker: "RELIANCE".to_string()
        }
    );
}

#[test]
fn test_evaluation_is_idempotent() {
    let request = sliding_long();
    let config = EngineConfig::default();
    let first = evaluate_position(&request, &config).unwrap();
    let second = evaluate_position(&request, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_sliding_long_collects_risk_and_warnings() {
    let report = evaluate_position(&sliding_long(), &EngineConfig::default()).unwrap();

    let kinds: Vec<AlertKind> = report.alerts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![AlertKind::SlRisk, AlertKind::MtfWarning, AlertKind::VolumeWarning]
    );
    assert_eq!(report.alerts[0].priority, AlertPriority::Critical);
    assert_eq!(report.alerts[1].priority, AlertPriority::Medium);
    assert_eq!(report.alerts[2].priority, AlertPriority::Low);
    assert_eq!(report.overall_status, OverallStatus::Critical);
    assert!(report.trend_reversal.likely);
    assert!(report.pnl_pct < 0.0);
}

#[test]
fn test_alerts_are_ordered_by_priority() {
    for request in [sliding_long(), trailing_long()] {
        let report = evaluate_position(&request, &EngineConfig::default()).unwrap();
        assert!(report
            .alerts
            .windows(2)
            .all(|pair| pair[0].priority >= pair[1].priority));
        assert_eq!(report.highest_priority(), report.alerts.first().map(|a| a.priority));
    }
}

#[test]
fn test_risk_threshold_suppresses_risk_alert() {
    let config = EngineConfig {
        sl_risk_alert_threshold: 101.0,
        ..EngineConfig::default()
    };
    let report = evaluate_position(&sliding_long(), &config).unwrap();
    assert!(report.alerts.iter().all(|a| a.kind != AlertKind::SlRisk));
    // The score is still reported and still drives the status.
    assert!(report.sl_risk.as_ref().unwrap().value >= 80.0);
    assert_eq!(report.overall_status, OverallStatus::Critical);
}

#[test]
fn test_trailing_advice_surfaces_as_alert() {
    let report = evaluate_position(&trailing_long(), &EngineConfig::default()).unwrap();

    let expected_stop = 100.0 + 0.5 * (report.current_price - 100.0);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, AlertKind::TrailStop);
    assert_eq!(report.alerts[0].priority, AlertPriority::Medium);
    assert_close(report.trailing.as_ref().unwrap().new_stop_loss, expected_stop);
    assert_close(report.recommendation.new_stop_loss.unwrap(), expected_stop);
    assert_eq!(report.overall_status, OverallStatus::Good);
}

#[test]
fn test_trailing_waits_for_configured_profit() {
    let config = EngineConfig {
        trail_after_profit_pct: 8.0,
        ..EngineConfig::default()
    };
    let report = evaluate_position(&trailing_long(), &config).unwrap();
    assert!(report.trailing.is_none());
    assert!(report.alerts.is_empty());
    assert_eq!(report.overall_status, OverallStatus::Ok);
}

#[test]
fn test_weekly_and_hourly_feed_alignment() {
    let mut request = trailing_long();
    request.weekly = Some(geometric(40, 60.0, 1.01));
    request.hourly = None;
    let report = evaluate_position(&request, &EngineConfig::default()).unwrap();

    assert_eq!(report.mtf.timeframes.len(), 2);
    assert_eq!(report.mtf.excluded, vec![Timeframe::Hourly]);
}

#[test]
fn test_portfolio_keeps_going_past_bad_positions() {
    let mut bad = trailing_long();
    bad.position.ticker = "BAD".to_string();
    bad.position.stop_loss = 130.0;

    let report = evaluate_portfolio(
        &[trailing_long(), bad, sliding_long()],
        &EngineConfig::default(),
    );

    assert_eq!(report.reports.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].ticker, "BAD");
    assert!(matches!(report.failures[0].error, EngineError::InvalidPosition(_)));

    let summary = &report.summary;
    assert_eq!(summary.positions, 2);
    assert_close(summary.total_invested, 1700.0);
    assert_eq!(summary.winners, 1);
    assert_eq!(summary.losers, 1);
    assert_eq!(summary.critical_alerts, 1);
    assert_eq!(summary.sl_hit, 0);
    assert_eq!(summary.target_hit, 0);
}
