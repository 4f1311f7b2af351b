//! One monitoring pass over the open portfolio: fetch candles, evaluate,
//! hand alerts to the sink. Scheduling is left to the caller.

use crate::config::Config;
use crate::indicators::resample_weekly;
use crate::metrics::Metrics;
use crate::models::indicators::{Candle, Timeframe};
use crate::models::position::Position;
use crate::services::{AlertSink, MarketDataProvider, PortfolioStore, ServiceError};
use crate::signals::engine::{
    evaluate_position, EvaluationRequest, PortfolioReport, PortfolioSummary, PositionFailure,
};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

pub const DAILY_LOOKBACK: usize = 180;
pub const WEEKLY_LOOKBACK: usize = 52;
pub const HOURLY_LOOKBACK: usize = 60;

pub struct PortfolioMonitor {
    market_data: Arc<dyn MarketDataProvider>,
    portfolio: Arc<dyn PortfolioStore>,
    sink: Arc<dyn AlertSink>,
    config: Config,
    metrics: Option<Arc<Metrics>>,
}

impl PortfolioMonitor {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        portfolio: Arc<dyn PortfolioStore>,
        sink: Arc<dyn AlertSink>,
        config: Config,
    ) -> Self {
        Self {
            market_data,
            portfolio,
            sink,
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Evaluate every open position as of `now`.
    ///
    /// Fails only when the portfolio itself cannot be loaded. Market data
    /// and delivery failures are logged and the pass carries on.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<PortfolioReport, ServiceError> {
        let positions = self.portfolio.open_positions().await?;
        let market_open = self.config.market_hours.is_open(now);
        info!(positions = positions.len(), market_open, "monitor: starting pass");

        let requests = join_all(
            positions
                .into_iter()
                .map(|position| self.build_request(position, market_open)),
        )
        .await;

        let mut reports = Vec::with_capacity(requests.len());
        let mut failures = Vec::new();
        let mut invested = 0.0;
        for request in &requests {
            let started = Instant::now();
            let outcome = evaluate_position(request, &self.config.engine);
            if let Some(metrics) = &self.metrics {
                metrics
                    .position_evaluation_duration_seconds
                    .observe(started.elapsed().as_secs_f64());
            }
            match outcome {
                Ok(report) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.position_evaluations_total.inc();
                        metrics.record_alerts(&report.alerts);
                    }
                    invested += request.position.invested();
                    reports.push(report);
                }
                Err(err) => {
                    warn!(ticker = %request.position.ticker, error = %err, "monitor: evaluation failed");
                    if let Some(metrics) = &self.metrics {
                        metrics.position_evaluation_failures_total.inc();
                    }
                    failures.push(PositionFailure {
                        ticker: request.position.ticker.clone(),
                        error: err,
                    });
                }
            }
        }

        for report in &reports {
            let Some(priority) = report.highest_priority() else {
                continue;
            };
            if let Err(err) = self.sink.deliver(report, &report.alerts).await {
                error!(
                    ticker = %report.ticker,
                    priority = ?priority,
                    error = %err,
                    "monitor: alert delivery failed"
                );
            }
        }

        let summary = PortfolioSummary::from_reports(&reports, invested);
        info!(
            evaluated = summary.positions,
            failed = failures.len(),
            critical = summary.critical_alerts,
            high = summary.high_alerts,
            "monitor: pass complete"
        );
        Ok(PortfolioReport {
            reports,
            failures,
            summary,
        })
    }

    async fn build_request(&self, position: Position, market_open: bool) -> EvaluationRequest {
        let ticker = position.ticker.as_str();
        let daily = self
            .fetch(ticker, Timeframe::Daily, DAILY_LOOKBACK)
            .await
            .unwrap_or_default();

        let weekly = match self.fetch(ticker, Timeframe::Weekly, WEEKLY_LOOKBACK).await {
            Some(weekly) if !weekly.is_empty() => Some(weekly),
            _ if !daily.is_empty() => Some(resample_weekly(&daily)),
            _ => None,
        };

        let hourly = if market_open {
            self.fetch(ticker, Timeframe::Hourly, HOURLY_LOOKBACK)
                .await
                .filter(|candles| !candles.is_empty())
        } else {
            None
        };

        EvaluationRequest {
            position,
            daily,
            weekly,
            hourly,
        }
    }

    async fn fetch(&self, ticker: &str, timeframe: Timeframe, lookback: usize) -> Option<Vec<Candle>> {
        match self.market_data.get_candles(ticker, timeframe, lookback).await {
            Ok(candles) => Some(candles),
            Err(err) => {
                warn!(ticker, timeframe = %timeframe, error = %err, "monitor: market data fetch failed");
                None
            }
        }
    }
}
