//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = EMA[i-1] + k*(C[i] - EMA[i-1]).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{closes, ema_values, simple_series};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = ema_values(&closes(bars), period);
    simple_series(bars, &values, IndicatorType::Ema(period))
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
    fn ema_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn ema_period_1() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);

        assert!(series.values.iter().all(|p| p.valid));
        assert_eq!(series.values[1].value, IndicatorValue::Simple(20.0));
    }

    #[test]
    fn ema_seed_is_sma() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        if let IndicatorValue::Simple(v) = series.values[2].value {
            let expected_sma = (10.0 + 20.0 + 30.0) / 3.0;
            assert!((v - expected_sma).abs() < f64::EPSILON);
        } else {
            panic!("Expected Simple value");
        }
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = sma + k * (40.0 - sma);
        let ema_4 = ema_3 + k * (50.0 - ema_3);

        if let IndicatorValue::Simple(v) = series.values[3].value {
            assert!((v - ema_3).abs() < 1e-12);
        }
        if let IndicatorValue::Simple(v) = series.values[4].value {
            assert!((v - ema_4).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0; 8]);
        let series = calculate_ema(&bars, 3);

        for point in series.values.iter().skip(2) {
            if let IndicatorValue::Simple(v) = point.value {
                assert!((v - 100.0).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.values.is_empty());
    }

    #[test]
    fn ema_period_0() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 0);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
