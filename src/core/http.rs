//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::EngineConfig;
use crate::metrics::Metrics;
use crate::signals::engine::{
    evaluate_portfolio, evaluate_position, EvaluationRequest, PortfolioReport, PositionReport,
};

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub config: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, config: EngineConfig) -> Self {
        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            config: Arc::new(config),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": "posguard-position-engine"
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Evaluate a single position. Rejected input answers 422 with the error.
async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<PositionReport>, (StatusCode, Json<Value>)> {
    let started = Instant::now();
    let outcome = evaluate_position(&request, &state.config);
    state
        .metrics
        .position_evaluation_duration_seconds
        .observe(started.elapsed().as_secs_f64());

    match outcome {
        Ok(report) => {
            state.metrics.position_evaluations_total.inc();
            state.metrics.record_alerts(&report.alerts);
            Ok(Json(report))
        }
        Err(err) => {
            state.metrics.position_evaluation_failures_total.inc();
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": err.to_string(),
                    "detail": err,
                })),
            ))
        }
    }
}

async fn evaluate_many(
    State(state): State<AppState>,
    Json(requests): Json<Vec<EvaluationRequest>>,
) -> Json<PortfolioReport> {
    let report = evaluate_portfolio(&requests, &state.config);
    state
        .metrics
        .position_evaluations_total
        .inc_by(report.reports.len() as u64);
    state
        .metrics
        .position_evaluation_failures_total
        .inc_by(report.failures.len() as u64);
    for position in &report.reports {
        state.metrics.record_alerts(&position.alerts);
    }
    Json(report)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/evaluate", post(evaluate))
        .route("/api/portfolio/evaluate", post(evaluate_many))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let app = create_router(AppState::new(metrics, config));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
