//! Candle supply for the monitor.

use super::ServiceError;
use crate::models::indicators::{Candle, Timeframe};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Up to `lookback` most recent candles, oldest first. An unknown
    /// series is an empty vector, not an error.
    async fn get_candles(
        &self,
        ticker: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Candle>, ServiceError>;
}

/// Provider backed by series loaded up front. Used by tests and the CLI.
#[derive(Default)]
pub struct InMemoryMarketData {
    series: RwLock<HashMap<(String, Timeframe), Vec<Candle>>>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, ticker: &str, timeframe: Timeframe, mut candles: Vec<Candle>) {
        candles.sort_by_key(|c| c.timestamp);
        self.series
            .write()
            .await
            .insert((ticker.to_string(), timeframe), candles);
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for InMemoryMarketData {
    async fn get_candles(
        &self,
        ticker: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Candle>, ServiceError> {
        let series = self.series.read().await;
        let Some(candles) = series.get(&(ticker.to_string(), timeframe)) else {
            return Ok(Vec::new());
        };
        let start = candles.len().saturating_sub(lookback);
        Ok(candles[start..].to_vec())
    }
}
