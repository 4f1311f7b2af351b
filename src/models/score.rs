use serde::{Deserialize, Serialize};

/// One additive contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub label: String,
    pub points: f64,
    pub rationale: String,
}

impl ScoreComponent {
    pub fn new(label: impl Into<String>, points: f64, rationale: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points,
            rationale: rationale.into(),
        }
    }
}

/// A 0-100 score with its ordered breakdown.
///
/// `value` is always the sum of the component points clamped to [0, 100];
/// individual components are never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult<C> {
    pub value: f64,
    pub raw_sum: f64,
    pub components: Vec<ScoreComponent>,
    pub classification: C,
}

impl<C> ScoreResult<C> {
    pub fn from_components(components: Vec<ScoreComponent>, classify: impl FnOnce(f64) -> C) -> Self {
        let raw_sum: f64 = components.iter().map(|c| c.points).sum();
        let value = clamp_score(raw_sum);
        Self {
            value,
            raw_sum,
            classification: classify(value),
            components,
        }
    }

    /// Components that moved the score, in factor order.
    pub fn contributing(&self) -> impl Iterator<Item = &ScoreComponent> {
        self.components.iter().filter(|c| c.points != 0.0)
    }

    /// Rationales of the contributing components joined for alert text.
    pub fn summary(&self, limit: usize) -> String {
        self.contributing()
            .take(limit)
            .map(|c| c.rationale.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}
