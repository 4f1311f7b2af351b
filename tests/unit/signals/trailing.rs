//! Unit tests for the trailing stop advisor

use crate::fixtures::{assert_close, long, short};
use posguard::signals::trailing::{advise_trailing_stop, trail_tier, TrailTier};

#[test]
fn test_ten_percent_locks_major_profit() {
    let position = long(1500.0, 1450.0, 1700.0, 1800.0);
    let advice = advise_trailing_stop(&position, 1650.0).unwrap();
    assert_eq!(advice.tier, TrailTier::LockMajorProfit);
    assert_close(advice.new_stop_loss, 1605.0);
    assert_close(advice.profit_pct, 10.0);
    assert_eq!(advice.current_stop_loss, 1450.0);
}

#[test]
fn test_tier_boundaries() {
    assert_eq!(trail_tier(1.99), None);
    assert_eq!(trail_tier(2.0), Some((TrailTier::Breakeven, 0.0)));
    assert_eq!(trail_tier(4.0), Some((TrailTier::SecureGains, 0.3)));
    assert_eq!(trail_tier(6.0), Some((TrailTier::SecureGains, 0.5)));
    assert_eq!(trail_tier(8.0), Some((TrailTier::LockProfits, 0.6)));
    assert_eq!(trail_tier(9.99), Some((TrailTier::LockProfits, 0.6)));
    assert_eq!(trail_tier(25.0), Some((TrailTier::LockMajorProfit, 0.7)));
    assert_eq!(trail_tier(-5.0), None);
}

#[test]
fn test_breakeven_moves_stop_to_entry() {
    let position = long(100.0, 95.0, 110.0, 120.0);
    let advice = advise_trailing_stop(&position, 103.0).unwrap();
    assert_eq!(advice.tier, TrailTier::Breakeven);
    assert_eq!(advice.new_stop_loss, 100.0);
}

#[test]
fn test_never_loosens_existing_stop() {
    let mut position = long(1500.0, 1450.0, 1700.0, 1800.0);
    position.stop_loss = 1620.0;
    assert!(advise_trailing_stop(&position, 1650.0).is_none());

    // Already at breakeven: the breakeven tier offers nothing new.
    let position = long(100.0, 100.0, 110.0, 120.0);
    assert!(advise_trailing_stop(&position, 103.0).is_none());
}

#[test]
fn test_short_stop_trails_below_entry() {
    let position = short(100.0, 105.0, 95.0, 85.0);
    let advice = advise_trailing_stop(&position, 90.0).unwrap();
    assert_eq!(advice.tier, TrailTier::LockMajorProfit);
    assert_close(advice.new_stop_loss, 93.0);
    assert!(advice.new_stop_loss < position.stop_loss);
}

#[test]
fn test_losing_position_gets_no_advice() {
    let position = long(100.0, 90.0, 110.0, 120.0);
    assert!(advise_trailing_stop(&position, 97.0).is_none());
}
