//! Volume indicators.
//!
//! VOLUME_SMA(n)[i] = mean(V[i-n+1..=i])
//! VOLUME_RATIO(n)[i] = V[i] / VOLUME_SMA(n)[i], undefined when the average is 0.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{simple_series, sma_values};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;

fn volume_averages(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    let volumes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.volume as f64)).collect();
    sma_values(&volumes, period)
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = volume_averages(bars, period);
    simple_series(bars, &values, IndicatorType::VolumeSma(period))
}

pub fn calculate_volume_ratio(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values: Vec<Option<f64>> = volume_averages(bars, period)
        .into_iter()
        .zip(bars)
        .map(|(avg, bar)| avg.filter(|a| *a > 0.0).map(|a| bar.volume as f64 / a))
        .collect();
    simple_series(bars, &values, IndicatorType::VolumeRatio(period))
}
