//! Trend classification.

use crate::domain::indicator::calculate_sma;
use crate::domain::ohlcv::OhlcvBar;
use std::fmt;

pub const DEFAULT_SHORT: usize = 10;
pub const DEFAULT_LONG: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    StrongUptrend,
    Uptrend,
    StrongDowntrend,
    Downtrend,
    Sideways,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::StrongUptrend => "Strong Uptrend",
            TrendDirection::Uptrend => "Uptrend",
            TrendDirection::StrongDowntrend => "Strong Downtrend",
            TrendDirection::Downtrend => "Downtrend",
            TrendDirection::Sideways => "Sideways",
        };
        f.write_str(s)
    }
}

/// Classify the latest close against the short and long SMAs.
///
/// - price > short > long: strong uptrend
/// - price < short < long: strong downtrend
/// - anything else, including a price between the two averages: sideways
///
/// `Uptrend` and `Downtrend` require price above (below) the short SMA with
/// the averages in order, which is the strict chain itself, so the
/// classifier never yields them.
///
/// `None` while the long SMA is still warming up.
pub fn trend_direction(bars: &[OhlcvBar], short: usize, long: usize) -> Option<TrendDirection> {
    let price = bars.last()?.close;
    let short_ma = calculate_sma(bars, short).latest_simple()?;
    let long_ma = calculate_sma(bars, long).latest_simple()?;
    Some(classify(price, short_ma, long_ma))
}

fn classify(price: f64, short_ma: f64, long_ma: f64) -> TrendDirection {
    if price > short_ma && short_ma > long_ma {
        TrendDirection::StrongUptrend
    } else if price < short_ma && short_ma < long_ma {
        TrendDirection::StrongDowntrend
    } else {
        TrendDirection::Sideways
    }
}

/// Short-horizon trend from the slopes of the last 5 and last 10 closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeTrend {
    StrongUptrend,
    ShortTermUptrend,
    StrongDowntrend,
    ShortTermDowntrend,
    Sideways,
}

impl fmt::Display for SlopeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlopeTrend::StrongUptrend => "Strong Uptrend",
            SlopeTrend::ShortTermUptrend => "Short-term Uptrend",
            SlopeTrend::StrongDowntrend => "Strong Downtrend",
            SlopeTrend::ShortTermDowntrend => "Short-term Downtrend",
            SlopeTrend::Sideways => "Sideways",
        };
        f.write_str(s)
    }
}

pub fn slope_trend(bars: &[OhlcvBar]) -> Option<SlopeTrend> {
    if bars.len() < 10 {
        return None;
    }

    let slope = |n: usize| {
        let window = &bars[bars.len() - n..];
        (window[n - 1].close - window[0].close) / n as f64
    };
    let short_slope = slope(5);
    let medium_slope = slope(10);

    let trend = if short_slope > 0.0 && medium_slope > 0.0 {
        SlopeTrend::StrongUptrend
    } else if short_slope > 0.0 {
        SlopeTrend::ShortTermUptrend
    } else if short_slope < 0.0 && medium_slope < 0.0 {
        SlopeTrend::StrongDowntrend
    } else if short_slope < 0.0 {
        SlopeTrend::ShortTermDowntrend
    } else {
        SlopeTrend::Sideways
    };
    Some(trend)
}
