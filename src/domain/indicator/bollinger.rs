//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{closes, sma_values, stddev_values};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let prices = closes(bars);
    let middle = sma_values(&prices, period);
    let stddev = stddev_values(&prices, period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (valid, value) = match (middle[i], stddev[i]) {
                (Some(middle), Some(sd)) => (
                    true,
                    IndicatorValue::Bollinger {
                        upper: middle + mult * sd,
                        middle,
                        lower: middle - mult * sd,
                    },
                ),
                _ => (
                    false,
                    IndicatorValue::Bollinger {
                        upper: 0.0,
                        middle: 0.0,
                        lower: 0.0,
                    },
                ),
            };
            IndicatorPoint {
                date: bar.date,
                valid,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}
