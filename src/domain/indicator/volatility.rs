//! Annualized volatility of daily returns.
//!
//! r[i] = (C[i] - C[i-1]) / C[i-1]
//! VOL(n)[i] = stddev(r over trailing n returns) * sqrt(252)
//!
//! The scalar form shrinks the window to the available returns when the
//! history is shorter than `n`, and is undefined with fewer than two bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{population_stddev, simple_series, stddev_values};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

fn daily_returns(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

pub fn calculate_volatility(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    // Aligned to bars: the first bar has no return.
    let returns: Vec<Option<f64>> = std::iter::once(None)
        .chain(daily_returns(bars).into_iter().map(Some))
        .take(bars.len())
        .collect();

    let values: Vec<Option<f64>> = stddev_values(&returns, period)
        .into_iter()
        .map(|sd| sd.map(|s| s * TRADING_DAYS_PER_YEAR.sqrt()))
        .collect();

    simple_series(bars, &values, IndicatorType::Volatility(period))
}

pub fn volatility(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    let returns = daily_returns(bars);
    if returns.is_empty() || period == 0 {
        return None;
    }
    let window = &returns[returns.len().saturating_sub(period)..];
    Some(population_stddev(window) * TRADING_DAYS_PER_YEAR.sqrt())
}
