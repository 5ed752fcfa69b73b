//! Stochastic Oscillator.
//!
//! %K = 100 * (C - LL(k)) / (HH(k) - LL(k))
//! %D = SMA(%K, d)
//!
//! A window with HH == LL has no defined %K; %D over such a window is
//! undefined as well.
//! Warmup: first (k + d - 2) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::sma_values;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

pub fn calculate_stochastic(bars: &[OhlcvBar], k_period: usize, d_period: usize) -> IndicatorSeries {
    let k_values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| {
            if k_period == 0 || i + 1 < k_period {
                return None;
            }
            let window = &bars[i + 1 - k_period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let range = highest - lowest;
            if range <= 0.0 {
                None
            } else {
                Some(100.0 * (bars[i].close - lowest) / range)
            }
        })
        .collect();
    let d_values = sma_values(&k_values, d_period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match (k_values[i], d_values[i]) {
            (Some(k), Some(d)) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Stochastic { k, d },
            },
            (k, _) => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Stochastic {
                    k: k.unwrap_or(0.0),
                    d: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic { k_period, d_period },
        values,
    }
}
