//! Rolling standard deviation of closing prices.
//!
//! Population standard deviation (divides by N).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{closes, simple_series, stddev_values};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = stddev_values(&closes(bars), period);
    simple_series(bars, &values, IndicatorType::Stddev(period))
}
