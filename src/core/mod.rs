//! Application wiring around the engine: the HTTP API and the monitor pass.

pub mod http;
pub mod monitor;

pub use http::{create_router, start_server, AppState};
pub use monitor::PortfolioMonitor;
