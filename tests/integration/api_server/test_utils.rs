//! Test utilities for API server integration tests

use axum_test::TestServer;
use posguard::config::EngineConfig;
use posguard::core::http::{create_router, AppState};
use posguard::metrics::Metrics;
use std::sync::Arc;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    pub async fn with_config(config: EngineConfig) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let app = create_router(AppState::new(metrics.clone(), config));
        let server = TestServer::new(app).expect("start test server");

        Self { server, metrics }
    }
}
