//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{closes, simple_series, sma_values};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = sma_values(&closes(bars), period);
    simple_series(bars, &values, IndicatorType::Sma(period))
}
