//! Unit tests for alert ordering and score clamping

use posguard::models::alert::{sort_alerts, Alert, AlertKind, AlertPriority};
use posguard::models::score::{clamp_score, ScoreComponent, ScoreResult};

fn alert(priority: AlertPriority, kind: AlertKind, score: f64) -> Alert {
    Alert::new(priority, kind, "msg", "act").with_score("score", score)
}

#[test]
fn test_sort_by_priority_then_score() {
    let mut alerts = vec![
        alert(AlertPriority::Low, AlertKind::VolumeWarning, 2.5),
        alert(AlertPriority::Medium, AlertKind::TrailStop, 5.0),
        alert(AlertPriority::Critical, AlertKind::StopLossHit, 100.0),
        alert(AlertPriority::Medium, AlertKind::MtfWarning, 33.0),
    ];
    sort_alerts(&mut alerts);

    let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            AlertKind::StopLossHit,
            AlertKind::MtfWarning,
            AlertKind::TrailStop,
            AlertKind::VolumeWarning,
        ]
    );
}

#[test]
fn test_sort_is_stable_on_equal_keys() {
    let mut alerts = vec![
        alert(AlertPriority::Medium, AlertKind::TrailStop, 10.0),
        alert(AlertPriority::Medium, AlertKind::MtfWarning, 10.0),
    ];
    sort_alerts(&mut alerts);
    assert_eq!(alerts[0].kind, AlertKind::TrailStop);
}

#[test]
fn test_only_final_sum_is_clamped() {
    let result = ScoreResult::from_components(
        vec![
            ScoreComponent::new("a", 80.0, "a"),
            ScoreComponent::new("b", 40.0, "b"),
            ScoreComponent::new("c", -5.0, "c"),
        ],
        |v| v,
    );
    assert_eq!(result.raw_sum, 115.0);
    assert_eq!(result.value, 100.0);
    assert_eq!(result.components[1].points, 40.0);
    assert_eq!(clamp_score(-12.0), 0.0);
    assert_eq!(clamp_score(f64::NAN), 0.0);
}

#[test]
fn test_summary_skips_zero_components() {
    let result = ScoreResult::from_components(
        vec![
            ScoreComponent::new("a", 10.0, "first"),
            ScoreComponent::new("b", 0.0, "insufficient data"),
            ScoreComponent::new("c", 5.0, "second"),
        ],
        |_| (),
    );
    assert_eq!(result.summary(5), "first, second");
    assert_eq!(result.summary(1), "first");
}
