//! Shared helper functions for indicator calculations.

use crate::domain::indicator::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_momentum,
    calculate_rsi, calculate_sma, calculate_stddev, calculate_stochastic, calculate_volatility,
    calculate_volume_ratio, calculate_volume_sma, IndicatorPoint, IndicatorResult,
    IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

/// Trailing arithmetic mean; `None` until `period` consecutive defined inputs exist.
pub fn sma_values(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            let sum: Option<f64> = window.iter().copied().sum();
            sum.map(|s| s / period as f64)
        })
        .collect()
}

/// EMA with `alpha = 2/(period+1)`, seeded by the SMA of the first `period`
/// defined inputs. Leading `None` entries are skipped.
pub fn ema_values(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut seen = 0usize;
    let mut sum = 0.0;
    let mut ema: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = *value else {
            continue;
        };
        match ema {
            None => {
                seen += 1;
                sum += v;
                if seen == period {
                    let seed = sum / period as f64;
                    ema = Some(seed);
                    out[i] = Some(seed);
                }
            }
            Some(prev) => {
                let next = prev + k * (v - prev);
                ema = Some(next);
                out[i] = Some(next);
            }
        }
    }

    out
}

/// Population standard deviation over a trailing window.
pub fn stddev_values(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window: Option<Vec<f64>> = values[i + 1 - period..=i].iter().copied().collect();
            window.map(|w| population_stddev(&w))
        })
        .collect()
}

pub fn population_stddev(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let mean = window.iter().sum::<f64>() / window.len() as f64;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

pub fn closes(bars: &[OhlcvBar]) -> Vec<Option<f64>> {
    bars.iter().map(|b| Some(b.close)).collect()
}

/// Wrap per-bar scalar values into an aligned series.
pub fn simple_series(
    bars: &[OhlcvBar],
    values: &[Option<f64>],
    indicator_type: IndicatorType,
) -> IndicatorSeries {
    let values = bars
        .iter()
        .zip(values)
        .map(|(bar, v)| IndicatorPoint {
            date: bar.date,
            valid: v.is_some(),
            value: IndicatorValue::Simple(v.unwrap_or(0.0)),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_indicator(bars: &[OhlcvBar], indicator: &IndicatorType) -> IndicatorSeries {
    match *indicator {
        IndicatorType::Sma(p) => calculate_sma(bars, p),
        IndicatorType::Ema(p) => calculate_ema(bars, p),
        IndicatorType::Rsi(p) => calculate_rsi(bars, p),
        IndicatorType::Atr(p) => calculate_atr(bars, p),
        IndicatorType::Stddev(p) => calculate_stddev(bars, p),
        IndicatorType::Momentum(p) => calculate_momentum(bars, p),
        IndicatorType::Volatility(p) => calculate_volatility(bars, p),
        IndicatorType::VolumeSma(p) => calculate_volume_sma(bars, p),
        IndicatorType::VolumeRatio(p) => calculate_volume_ratio(bars, p),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
        IndicatorType::Stochastic { k_period, d_period } => {
            calculate_stochastic(bars, k_period, d_period)
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => calculate_bollinger(bars, period, stddev_mult_x100),
    }
}

pub fn compute_indicators(bars: &[OhlcvBar], indicators: &[IndicatorType]) -> IndicatorResult {
    indicators
        .iter()
        .map(|ind| {
            log::debug!("computing {} over {} bars", ind, bars.len());
            (ind.clone(), calculate_indicator(bars, ind))
        })
        .collect()
}
