//! Alert delivery. Formatting, cooldowns and transport belong to the sink.

use super::ServiceError;
use crate::config::EmailFlags;
use crate::models::alert::{Alert, AlertPriority};
use crate::signals::engine::PositionReport;
use tracing::{info, warn};

#[async_trait::async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, report: &PositionReport, alerts: &[Alert]) -> Result<(), ServiceError>;
}

/// Writes alerts allowed by `flags` to the log.
pub struct LoggingAlertSink {
    flags: EmailFlags,
}

impl LoggingAlertSink {
    pub fn new(flags: EmailFlags) -> Self {
        Self { flags }
    }
}

#[async_trait::async_trait]
impl AlertSink for LoggingAlertSink {
    async fn deliver(&self, report: &PositionReport, alerts: &[Alert]) -> Result<(), ServiceError> {
        for alert in alerts.iter().filter(|a| self.flags.allows(a)) {
            if alert.priority >= AlertPriority::High {
                warn!(
                    ticker = %report.ticker,
                    priority = %alert.priority,
                    kind = %alert.kind,
                    action = %alert.recommended_action,
                    "{}",
                    alert.message
                );
            } else {
                info!(
                    ticker = %report.ticker,
                    priority = %alert.priority,
                    kind = %alert.kind,
                    action = %alert.recommended_action,
                    "{}",
                    alert.message
                );
            }
        }
        Ok(())
    }
}
