//! Prometheus metrics for the API server and the portfolio monitor.

use crate::models::alert::Alert;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub position_evaluations_total: IntCounter,
    pub position_evaluation_failures_total: IntCounter,
    pub position_evaluation_duration_seconds: Histogram,
    pub alerts_emitted_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let position_evaluations_total = IntCounter::new(
            "position_evaluations_total",
            "Positions evaluated successfully",
        )?;
        let position_evaluation_failures_total = IntCounter::new(
            "position_evaluation_failures_total",
            "Positions rejected or missing market data",
        )?;
        let position_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "position_evaluation_duration_seconds",
                "Time spent evaluating one position",
            )
            .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1]),
        )?;
        let alerts_emitted_total = IntCounterVec::new(
            Opts::new("alerts_emitted_total", "Alerts emitted by priority"),
            &["priority"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(position_evaluations_total.clone()))?;
        registry.register(Box::new(position_evaluation_failures_total.clone()))?;
        registry.register(Box::new(position_evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(alerts_emitted_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            position_evaluations_total,
            position_evaluation_failures_total,
            position_evaluation_duration_seconds,
            alerts_emitted_total,
        })
    }

    pub fn record_alerts(&self, alerts: &[Alert]) {
        for alert in alerts {
            self.alerts_emitted_total
                .with_label_values(&[alert.priority.as_str()])
                .inc();
        }
    }

    /// Text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
