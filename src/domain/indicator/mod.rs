//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for the fixed record shape of each indicator family
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values aligned to the input bars
//! - `IndicatorResult`: Mapping from indicator identity to its series
//!
//! Scalar-valued indicators (volatility, momentum, support/resistance, trend)
//! return their own record types instead of a series.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod stochastic;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use atr::calculate_atr;
pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use levels::{support_resistance, SupportResistance};
pub use macd::calculate_macd;
pub use momentum::{calculate_momentum, momentum};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;
pub use stochastic::calculate_stochastic;
pub use trend::{slope_trend, trend_direction, SlopeTrend, TrendDirection};
pub use volatility::{calculate_volatility, volatility};
pub use volume::{calculate_volume_ratio, calculate_volume_sma};

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Stochastic {
        k: f64,
        d: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Stddev(usize),
    Momentum(usize),
    Volatility(usize),
    VolumeSma(usize),
    VolumeRatio(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

/// Indicator series keyed by indicator identity.
pub type IndicatorResult = HashMap<IndicatorType, IndicatorSeries>;

impl IndicatorSeries {
    /// Value of the final bar, or `None` when it is still inside the warmup.
    pub fn latest(&self) -> Option<&IndicatorValue> {
        self.values.last().filter(|p| p.valid).map(|p| &p.value)
    }

    pub fn latest_simple(&self) -> Option<f64> {
        match self.latest() {
            Some(IndicatorValue::Simple(v)) => Some(*v),
            _ => None,
        }
    }

    /// One entry per bar, `None` where the window has not filled.
    pub fn simple_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|p| match (p.valid, &p.value) {
                (true, IndicatorValue::Simple(v)) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Momentum(period) => write!(f, "MOMENTUM({})", period),
            IndicatorType::Volatility(period) => write!(f, "VOLATILITY({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::VolumeRatio(period) => write!(f, "VOLUME_RATIO({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
