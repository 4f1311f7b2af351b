//! Unit tests for the volume classifier

use crate::fixtures::{assert_close, neutral_snapshot};
use posguard::models::indicators::Reading;
use posguard::models::position::Direction;
use posguard::signals::volume::{classify_volume, Pressure, VolumeLabel, VolumeStrength, VolumeTrend};

fn snapshot(volume: f64, change: f64) -> posguard::models::indicators::IndicatorSnapshot {
    let mut snapshot = neutral_snapshot(100.0);
    snapshot.volume = volume;
    snapshot.prev_close = Some(100.0 - change);
    snapshot
}

#[test]
fn test_strong_buying_and_selling() {
    let signal = classify_volume(&snapshot(2000.0, 1.0));
    assert_eq!(signal.label, VolumeLabel::StrongBuying);
    assert_close(signal.ratio, 2.0);
    assert!(signal.is_strong_with(Direction::Long));
    assert!(signal.is_strong_against(Direction::Short));

    let signal = classify_volume(&snapshot(2000.0, -1.0));
    assert_eq!(signal.label, VolumeLabel::StrongSelling);
    assert!(signal.is_strong_against(Direction::Long));
}

#[test]
fn test_ratio_band_edges() {
    assert_eq!(classify_volume(&snapshot(1500.0, 1.0)).strength, VolumeStrength::Normal);
    assert_eq!(classify_volume(&snapshot(1200.0, -1.0)).label, VolumeLabel::Selling);
    assert_eq!(classify_volume(&snapshot(1000.0, 1.0)).label, VolumeLabel::WeakBuying);
    assert_eq!(classify_volume(&snapshot(500.0, -1.0)).label, VolumeLabel::WeakSelling);
}

#[test]
fn test_unchanged_close_is_neutral() {
    let signal = classify_volume(&snapshot(3000.0, 0.0));
    assert_eq!(signal.pressure, Pressure::Flat);
    assert_eq!(signal.label, VolumeLabel::Neutral);
    assert!(!signal.is_strong_against(Direction::Long));
    assert!(!signal.is_strong_against(Direction::Short));
}

#[test]
fn test_missing_or_zero_average_gives_zero_ratio() {
    let mut missing = snapshot(3000.0, 1.0);
    missing.avg_volume_20 = Reading::NotEnoughData {
        required: 20,
        available: 5,
    };
    let signal = classify_volume(&missing);
    assert_eq!(signal.ratio, 0.0);
    assert_eq!(signal.strength, VolumeStrength::Weak);
    assert_eq!(signal.trend, None);

    let mut zero = snapshot(3000.0, 1.0);
    zero.avg_volume_20 = Reading::available(0.0);
    assert_eq!(classify_volume(&zero).ratio, 0.0);
}

#[test]
fn test_volume_trend_compares_short_and_long_average() {
    let mut rising = snapshot(1000.0, 1.0);
    rising.avg_volume_5 = Reading::available(1300.0);
    assert_eq!(classify_volume(&rising).trend, Some(VolumeTrend::Increasing));
    assert_eq!(
        classify_volume(&snapshot(1000.0, 1.0)).trend,
        Some(VolumeTrend::Decreasing)
    );
}
