//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: max(fast, slow) - 1 + signal - 1 bars

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{closes, ema_values};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    let prices = closes(bars);
    let ema_fast = ema_values(&prices, fast);
    let ema_slow = ema_values(&prices, slow);

    let macd_line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    let values = bars
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(bar, (line, signal))| match (line, signal) {
            (Some(line), Some(signal)) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Macd {
                    line: *line,
                    signal: *signal,
                    histogram: line - signal,
                },
            },
            _ => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Macd {
                    line: line.unwrap_or(0.0),
                    signal: 0.0,
                    histogram: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
