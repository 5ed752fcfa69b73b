//! RSI (Relative Strength Index) indicator implementation.
//!
//! Averages are simple means of the trailing n close-to-close gains and losses
//! (no Wilder smoothing):
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, unless the window has no movement at all,
//! in which case the point is left invalid.
//!
//! Warmup: first n bars are invalid (n price changes need n+1 bars).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::simple_series;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values: Vec<Option<f64>> = vec![None; bars.len()];

    if period > 0 && bars.len() > period {
        let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

        for i in period..bars.len() {
            // changes[j] is the move into bar j+1
            let window = &changes[i - period..i];
            let avg_gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
            let avg_loss = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period as f64;

            values[i] = if avg_loss == 0.0 && avg_gain == 0.0 {
                None
            } else if avg_loss == 0.0 {
                Some(100.0)
            } else {
                Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
            };
        }
    }

    simple_series(bars, &values, IndicatorType::Rsi(period))
}
