//! Momentum (rate of change) indicator.
//!
//! MOM(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! Warmup: first n bars invalid. The scalar form reports 0 when the history
//! is shorter than n+1 bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::simple_series;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 5;

fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        ((to - from) / from) * 100.0
    }
}

pub fn calculate_momentum(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| (i >= period).then(|| percent_change(bars[i - period].close, bars[i].close)))
        .collect();

    simple_series(bars, &values, IndicatorType::Momentum(period))
}

pub fn momentum(bars: &[OhlcvBar], period: usize) -> f64 {
    if bars.len() < period + 1 {
        return 0.0;
    }
    let current = bars[bars.len() - 1].close;
    let past = bars[bars.len() - 1 - period].close;
    percent_change(past, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn momentum_warmup() {
        let series = calculate_momentum(&make_bars(&[100.0, 105.0, 110.0, 115.0, 120.0]), 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(!series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn momentum_basic_calculation() {
        let series = calculate_momentum(&make_bars(&[100.0, 105.0, 110.0, 115.0]), 2);

        if let IndicatorValue::Simple(v) = series.values[3].value {
            let expected = ((115.0 - 105.0) / 105.0) * 100.0;
            assert!((v - expected).abs() < f64::EPSILON);
        } else {
            panic!("Expected Simple value");
        }
    }

    #[test]
    fn doubling_over_period_is_100_percent() {
        let bars = make_bars(&[50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        assert_eq!(momentum(&bars, 5), 100.0);
    }

    #[test]
    fn negative_change() {
        let bars = make_bars(&[100.0, 90.0, 80.0]);
        assert!((momentum(&bars, 2) - (-20.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn insufficient_history_is_zero() {
        let bars = make_bars(&[100.0, 110.0, 120.0]);
        assert_eq!(momentum(&bars, 5), 0.0);
        assert_eq!(momentum(&[], DEFAULT_PERIOD), 0.0);
    }

    #[test]
    fn momentum_indicator_type() {
        let series = calculate_momentum(&make_bars(&[100.0]), 10);
        assert_eq!(series.indicator_type, IndicatorType::Momentum(10));
    }
}
