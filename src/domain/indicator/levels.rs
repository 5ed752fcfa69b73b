//! Support and resistance extraction from local extrema.
//!
//! Bar i is a support candidate when its low is the minimum low of
//! bars[i-w..=i+w], and a resistance candidate when its high is the maximum
//! high of that window. Bars within w of either end never qualify.
//! Reported support is the lowest candidate (min close when there are none);
//! reported resistance is the highest candidate (max close when there are none).

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
    /// Distinct support candidates, ascending.
    pub support_levels: Vec<f64>,
    /// Distinct resistance candidates, ascending.
    pub resistance_levels: Vec<f64>,
}

fn distinct_sorted(mut levels: Vec<f64>) -> Vec<f64> {
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    levels
}

/// `None` only for an empty series.
pub fn support_resistance(bars: &[OhlcvBar], window: usize) -> Option<SupportResistance> {
    if bars.is_empty() {
        return None;
    }

    let mut supports = Vec::new();
    let mut resistances = Vec::new();

    for i in window..bars.len().saturating_sub(window) {
        let span = &bars[i - window..=i + window];
        let lowest = span.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let highest = span.iter().map(|b| b.high).fold(f64::MIN, f64::max);

        if bars[i].low == lowest {
            supports.push(bars[i].low);
        }
        if bars[i].high == highest {
            resistances.push(bars[i].high);
        }
    }

    let min_close = bars.iter().map(|b| b.close).fold(f64::MAX, f64::min);
    let max_close = bars.iter().map(|b| b.close).fold(f64::MIN, f64::max);

    let support_levels = distinct_sorted(supports);
    let resistance_levels = distinct_sorted(resistances);

    Some(SupportResistance {
        support: support_levels.first().copied().unwrap_or(min_close),
        resistance: resistance_levels.last().copied().unwrap_or(max_close),
        support_levels,
        resistance_levels,
    })
}
