//! Source of open positions. The engine never writes back.

use super::ServiceError;
use crate::models::position::Position;
use tokio::sync::RwLock;

#[async_trait::async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn open_positions(&self) -> Result<Vec<Position>, ServiceError>;
}

#[derive(Default)]
pub struct InMemoryPortfolio {
    positions: RwLock<Vec<Position>>,
}

impl InMemoryPortfolio {
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions: RwLock::new(positions),
        }
    }

    /// Replace the position for `position.ticker`, or add it.
    pub async fn upsert(&self, position: Position) {
        let mut positions = self.positions.write().await;
        match positions.iter_mut().find(|p| p.ticker == position.ticker) {
            Some(existing) => *existing = position,
            None => positions.push(position),
        }
    }
}

#[async_trait::async_trait]
impl PortfolioStore for InMemoryPortfolio {
    async fn open_positions(&self) -> Result<Vec<Position>, ServiceError> {
        Ok(self.positions.read().await.clone())
    }
}
