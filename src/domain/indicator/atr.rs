//! Average True Range.
//!
//! TR[0] = H[0] - L[0], TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|)
//! ATR(n)[i] = mean(TR[i-n+1..=i]), a plain trailing mean.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{simple_series, sma_values};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let tr_values: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Some(if i == 0 {
                bar.range()
            } else {
                bar.true_range(bars[i - 1].close)
            })
        })
        .collect();

    let values = sma_values(&tr_values, period);
    simple_series(bars, &values, IndicatorType::Atr(period))
}
