//! Support and Resistance levels detection
//!
//! Four methods feed one sorted level list:
//! 1. pivot highs/lows (local extremes over 3 candles on each side),
//! 2. clustering of pivots within 1.5% of each other,
//! 3. round and half-round psychological levels near the current price,
//! 4. window max/min when the history has no pivots at all.

use crate::common::math;
use crate::models::indicators::Candle;
use crate::models::levels::{LevelKind, LevelSource, PriceLevel, SupportResistance};

pub const PIVOT_WING: usize = 3;
pub const CLUSTER_THRESHOLD_PCT: f64 = 1.5;
pub const PSYCHOLOGICAL_RANGE_PCT: f64 = 5.0;
const PIVOT_VOLUME_WINDOW: usize = 20;

/// A confirmed local extreme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub index: usize,
    pub price: f64,
    pub is_high: bool,
    pub high_volume: bool,
}

/// Calculate support and resistance levels over the last `lookback` candles
pub fn calculate_support_resistance(candles: &[Candle], lookback: usize) -> SupportResistance {
    let Some(last) = candles.last() else {
        return SupportResistance::empty();
    };
    let current_price = last.close;
    let window = &candles[candles.len().saturating_sub(lookback.max(1))..];

    let pivots = find_pivots(window);
    let mut levels = if pivots.is_empty() {
        fallback_levels(window, current_price)
    } else {
        cluster_pivots(&pivots, current_price)
    };
    add_psychological_levels(&mut levels, current_price);
    levels.sort_by(|a, b| a.price.total_cmp(&b.price));

    let nearest_support = nearest(&levels, |level| level.price < current_price, true);
    let nearest_resistance = nearest(&levels, |level| level.price > current_price, false);

    SupportResistance {
        distance_to_support_pct: nearest_support
            .and_then(|level| math::pct_distance(current_price, level.price, current_price)),
        distance_to_resistance_pct: nearest_resistance
            .and_then(|level| math::pct_distance(level.price, current_price, current_price)),
        levels,
        nearest_support,
        nearest_resistance,
    }
}

/// Find pivot highs and lows; a pivot's volume is compared with the
/// trailing 20-candle average ending at the pivot.
pub fn find_pivots(window: &[Candle]) -> Vec<Pivot> {
    let mut pivots = Vec::new();
    if window.len() < 2 * PIVOT_WING + 1 {
        return pivots;
    }

    for i in PIVOT_WING..window.len() - PIVOT_WING {
        let neighbours = (i - PIVOT_WING..=i + PIVOT_WING).filter(|&j| j != i);
        let candle = &window[i];
        let is_high = neighbours.clone().all(|j| candle.high > window[j].high);
        let is_low = neighbours.into_iter().all(|j| candle.low < window[j].low);
        if !is_high && !is_low {
            continue;
        }

        let volume_slice = &window[(i + 1).saturating_sub(PIVOT_VOLUME_WINDOW)..=i];
        let avg_volume = volume_slice.iter().map(|c| c.volume).sum::<f64>() / volume_slice.len() as f64;
        let high_volume = avg_volume > 0.0 && candle.volume > avg_volume;

        if is_high {
            pivots.push(Pivot {
                index: i,
                price: candle.high,
                is_high: true,
                high_volume,
            });
        }
        if is_low {
            pivots.push(Pivot {
                index: i,
                price: candle.low,
                is_high: false,
                high_volume,
            });
        }
    }
    pivots
}

/// Merge pivots lying within 1.5% of the first pivot of their cluster.
/// Highs and lows are pooled: a level's role depends only on where it sits
/// relative to the current price.
pub fn cluster_pivots(pivots: &[Pivot], current_price: f64) -> Vec<PriceLevel> {
    let mut sorted: Vec<Pivot> = pivots.iter().copied().filter(|p| p.price > 0.0).collect();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut clusters: Vec<Vec<Pivot>> = Vec::new();
    for pivot in sorted {
        match clusters.last_mut() {
            Some(cluster)
                if (pivot.price - cluster[0].price) / cluster[0].price * 100.0 < CLUSTER_THRESHOLD_PCT =>
            {
                cluster.push(pivot)
            }
            _ => clusters.push(vec![pivot]),
        }
    }

    clusters
        .into_iter()
        .map(|cluster| {
            let touches = cluster.len() as u32;
            let price = cluster.iter().map(|p| p.price).sum::<f64>() / cluster.len() as f64;
            let source = if touches > 1 {
                LevelSource::Cluster
            } else {
                LevelSource::Pivot
            };
            let mut level = PriceLevel::new(price, kind_for(price, current_price), touches, source);
            level.volume_confirmed = cluster.iter().filter(|p| p.high_volume).count() as u32;
            level
        })
        .collect()
}

/// Window extremes used when the history has no pivots.
pub fn fallback_levels(window: &[Candle], current_price: f64) -> Vec<PriceLevel> {
    let mut levels = Vec::new();
    let max_high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let min_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

    if min_low.is_finite() && min_low > 0.0 && min_low < current_price {
        levels.push(PriceLevel::new(min_low, LevelKind::Support, 1, LevelSource::Fallback));
    }
    if max_high.is_finite() && max_high > current_price {
        levels.push(PriceLevel::new(max_high, LevelKind::Resistance, 1, LevelSource::Fallback));
    }
    levels
}

/// Add round and half-round numbers within 5% of price that no detected
/// level already covers.
pub fn add_psychological_levels(levels: &mut Vec<PriceLevel>, current_price: f64) {
    if !(current_price > 0.0 && current_price.is_finite()) {
        return;
    }
    let magnitude = 10f64.powf(current_price.log10().floor());
    let half_step = magnitude / 20.0;
    let low = current_price * (1.0 - PSYCHOLOGICAL_RANGE_PCT / 100.0);
    let high = current_price * (1.0 + PSYCHOLOGICAL_RANGE_PCT / 100.0);

    let first = (low / half_step).ceil() as i64;
    let last = (high / half_step).floor() as i64;
    for k in first..=last {
        let candidate = k as f64 * half_step;
        if candidate <= 0.0 || candidate == current_price {
            continue;
        }
        let covered = levels.iter().any(|level| {
            (level.price - candidate).abs() / candidate * 100.0 < CLUSTER_THRESHOLD_PCT
        });
        if !covered {
            levels.push(PriceLevel::new(
                candidate,
                kind_for(candidate, current_price),
                0,
                LevelSource::Psychological,
            ));
        }
    }
}

fn kind_for(price: f64, current_price: f64) -> LevelKind {
    if price < current_price {
        LevelKind::Support
    } else {
        LevelKind::Resistance
    }
}

/// Closest level on one side, preferring levels confirmed by price action
/// over psychological candidates. `levels` is sorted ascending.
fn nearest(levels: &[PriceLevel], side: impl Fn(&PriceLevel) -> bool, below: bool) -> Option<PriceLevel> {
    let pick = |confirmed: bool| {
        let mut candidates = levels
            .iter()
            .filter(|level| side(level) && (level.touch_count > 0) == confirmed);
        if below {
            candidates.next_back().copied()
        } else {
            candidates.next().copied()
        }
    };
    pick(true).or_else(|| pick(false))
}
