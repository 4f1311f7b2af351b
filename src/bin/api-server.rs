//! Posguard API Server
//!
//! Stateless HTTP API over the position engine; safe to scale horizontally.

use dotenvy::dotenv;
use posguard::config::{get_environment, get_port, Config};
use posguard::core::http::start_server;
use posguard::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    let port = get_port();

    info!("Starting Posguard API Server");
    info!(environment = %get_environment(), "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, config.engine).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
