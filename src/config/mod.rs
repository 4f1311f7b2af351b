//! Runtime configuration.
//!
//! Engine thresholds travel as an explicit `EngineConfig` value; nothing in
//! the engine reads process state. `Config::from_env` is for the binaries.

use crate::models::alert::{Alert, AlertKind, AlertPriority};
use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

const ENV_PREFIX: &str = "POSGUARD_";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a non-negative finite number, got {value}")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("cache ttl {cache_ttl_secs}s must be at least 1.5x the poll interval {poll_interval_secs}s")]
    CacheTtlTooShort {
        cache_ttl_secs: u64,
        poll_interval_secs: u64,
    },

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: String, value: String },
}

/// Which alerts a notification sink forwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailFlags {
    pub enabled: bool,
    pub on_critical: bool,
    pub on_high: bool,
    pub on_target: bool,
    pub on_trail: bool,
    pub on_warnings: bool,
}

impl Default for EmailFlags {
    fn default() -> Self {
        Self {
            enabled: false,
            on_critical: true,
            on_high: true,
            on_target: true,
            on_trail: true,
            on_warnings: false,
        }
    }
}

impl EmailFlags {
    pub fn allows(&self, alert: &Alert) -> bool {
        if !self.enabled {
            return false;
        }
        if alert.kind.is_target() {
            return self.on_target;
        }
        if alert.kind == AlertKind::TrailStop {
            return self.on_trail;
        }
        if alert.kind.is_warning() {
            return self.on_warnings;
        }
        match alert.priority {
            AlertPriority::Critical => self.on_critical,
            AlertPriority::High => self.on_high,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SL risk scores at or above this emit an alert.
    pub sl_risk_alert_threshold: f64,
    /// Minimum profit before trailing advice is surfaced.
    pub trail_after_profit_pct: f64,
    pub mtf_warning_alignment_pct: f64,
    pub sr_lookback: usize,
    pub email_flags: EmailFlags,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sl_risk_alert_threshold: 20.0,
            trail_after_profit_pct: 2.0,
            mtf_warning_alignment_pct: 40.0,
            sr_lookback: 60,
            email_flags: EmailFlags::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("sl_risk_alert_threshold", self.sl_risk_alert_threshold),
            ("trail_after_profit_pct", self.trail_after_profit_pct),
            ("mtf_warning_alignment_pct", self.mtf_warning_alignment_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    pub poll_interval_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            cache_ttl_secs: 90,
        }
    }
}

impl RefreshConfig {
    /// A cache entry has to outlive at least one refresh cycle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 2 * ttl >= 3 * poll, kept in integers.
        if self.cache_ttl_secs * 2 < self.poll_interval_secs * 3 {
            return Err(ConfigError::CacheTtlTooShort {
                cache_ttl_secs: self.cache_ttl_secs,
                poll_interval_secs: self.poll_interval_secs,
            });
        }
        Ok(())
    }
}

/// Exchange trading session in the exchange's local time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub utc_offset_secs: i32,
}

impl Default for MarketHours {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(15, 30, 0).unwrap_or(NaiveTime::MIN),
            utc_offset_secs: 5 * 3600 + 30 * 60,
        }
    }
}

impl MarketHours {
    /// Weekday session between `open` and `close`, both inclusive.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        let Some(offset) = FixedOffset::east_opt(self.utc_offset_secs) else {
            return false;
        };
        let local = now.with_timezone(&offset);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let time = local.time();
        time >= self.open && time <= self.close
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub engine: EngineConfig,
    pub refresh: RefreshConfig,
    pub market_hours: MarketHours,
}

impl Config {
    /// Defaults overridden by `POSGUARD_*` variables. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        let engine = &mut config.engine;
        override_from_env("SL_RISK_ALERT_THRESHOLD", &mut engine.sl_risk_alert_threshold)?;
        override_from_env("TRAIL_AFTER_PROFIT_PCT", &mut engine.trail_after_profit_pct)?;
        override_from_env("MTF_WARNING_ALIGNMENT_PCT", &mut engine.mtf_warning_alignment_pct)?;
        override_from_env("SR_LOOKBACK", &mut engine.sr_lookback)?;
        override_from_env("EMAIL_ENABLED", &mut engine.email_flags.enabled)?;
        override_from_env("EMAIL_ON_CRITICAL", &mut engine.email_flags.on_critical)?;
        override_from_env("EMAIL_ON_HIGH", &mut engine.email_flags.on_high)?;
        override_from_env("EMAIL_ON_TARGET", &mut engine.email_flags.on_target)?;
        override_from_env("EMAIL_ON_TRAIL", &mut engine.email_flags.on_trail)?;
        override_from_env("EMAIL_ON_WARNINGS", &mut engine.email_flags.on_warnings)?;
        override_from_env("POLL_INTERVAL_SECS", &mut config.refresh.poll_interval_secs)?;
        override_from_env("CACHE_TTL_SECS", &mut config.refresh.cache_ttl_secs)?;

        config.engine.validate()?;
        config.refresh.validate()?;
        Ok(config)
    }
}

fn override_from_env<T: FromStr>(key: &str, slot: &mut T) -> Result<(), ConfigError> {
    let name = format!("{}{}", ENV_PREFIX, key);
    if let Ok(raw) = env::var(&name) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { name, value: raw })?;
    }
    Ok(())
}

/// Deployment environment, `sandbox` unless `ENVIRONMENT` says otherwise.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}
