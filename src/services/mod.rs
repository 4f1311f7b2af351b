//! Collaborators at the edge of the engine: candle supply, the open
//! portfolio and alert delivery.

pub mod market_data;
pub mod notification;
pub mod portfolio;

use thiserror::Error;

pub use market_data::{InMemoryMarketData, MarketDataProvider};
pub use notification::{AlertSink, LoggingAlertSink};
pub use portfolio::{InMemoryPortfolio, PortfolioStore};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("market data unavailable for {ticker}: {reason}")]
    MarketData { ticker: String, reason: String },

    #[error("portfolio store error: {0}")]
    Portfolio(String),

    #[error("alert delivery failed: {0}")]
    Delivery(String),
}
