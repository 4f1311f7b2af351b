use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert urgency. Ordering is ascending, so `Critical` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertPriority {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::Info => "INFO",
            AlertPriority::Low => "LOW",
            AlertPriority::Medium => "MEDIUM",
            AlertPriority::High => "HIGH",
            AlertPriority::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    StopLossHit,
    BookFullProfits,
    TargetHold,
    BookProfits,
    PartialExit,
    SlRisk,
    TrailStop,
    MtfWarning,
    VolumeWarning,
}

impl AlertKind {
    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::StopLossHit => "STOP LOSS HIT",
            AlertKind::BookFullProfits => "BOOK FULL PROFITS",
            AlertKind::TargetHold => "TARGET HIT - HOLD",
            AlertKind::BookProfits => "BOOK PROFITS",
            AlertKind::PartialExit => "PARTIAL EXIT",
            AlertKind::SlRisk => "SL RISK",
            AlertKind::TrailStop => "TRAIL STOP",
            AlertKind::MtfWarning => "MTF WARNING",
            AlertKind::VolumeWarning => "VOLUME WARNING",
        }
    }

    pub fn is_target(&self) -> bool {
        matches!(
            self,
            AlertKind::BookFullProfits
                | AlertKind::TargetHold
                | AlertKind::BookProfits
                | AlertKind::PartialExit
        )
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, AlertKind::MtfWarning | AlertKind::VolumeWarning)
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingScore {
    pub name: String,
    pub value: f64,
}

impl SupportingScore {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub priority: AlertPriority,
    pub kind: AlertKind,
    pub message: String,
    pub recommended_action: String,
    /// The first entry is the score that drove the alert.
    pub supporting_scores: Vec<SupportingScore>,
}

impl Alert {
    pub fn new(
        priority: AlertPriority,
        kind: AlertKind,
        message: impl Into<String>,
        recommended_action: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            kind,
            message: message.into(),
            recommended_action: recommended_action.into(),
            supporting_scores: Vec::new(),
        }
    }

    pub fn with_score(mut self, name: impl Into<String>, value: f64) -> Self {
        self.supporting_scores.push(SupportingScore::new(name, value));
        self
    }

    pub fn driving_score(&self) -> f64 {
        self.supporting_scores.first().map(|s| s.value).unwrap_or(0.0)
    }
}

/// Sort by priority (highest first), then driving score descending.
/// The sort is stable so equal keys keep emission order.
pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.driving_score().total_cmp(&a.driving_score()))
    });
}
