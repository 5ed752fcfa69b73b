//! Candlestick pattern detection.
//!
//! Each detector returns the indices of the bars where the pattern fires,
//! in ascending order.

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_DOJI_THRESHOLD: f64 = 0.1;
pub const DEFAULT_HAMMER_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngulfingPatterns {
    pub bullish: Vec<usize>,
    pub bearish: Vec<usize>,
}

/// All patterns found in one series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandlestickPatterns {
    pub doji: Vec<usize>,
    pub hammer: Vec<usize>,
    pub engulfing: EngulfingPatterns,
}

impl CandlestickPatterns {
    pub fn is_empty(&self) -> bool {
        self.doji.is_empty()
            && self.hammer.is_empty()
            && self.engulfing.bullish.is_empty()
            && self.engulfing.bearish.is_empty()
    }
}

/// Body smaller than `threshold` of the bar's range. Zero-range bars never match.
pub fn doji(bars: &[OhlcvBar], threshold: f64) -> Vec<usize> {
    bars.iter()
        .enumerate()
        .filter(|(_, b)| {
            let range = b.range();
            range > 0.0 && b.body() / range < threshold
        })
        .map(|(i, _)| i)
        .collect()
}

/// Long lower shadow (> 2x body), short upper shadow (< threshold x body).
pub fn hammer(bars: &[OhlcvBar], threshold: f64) -> Vec<usize> {
    bars.iter()
        .enumerate()
        .filter(|(_, b)| {
            let body = b.body();
            body > 0.0 && b.lower_shadow() > 2.0 * body && b.upper_shadow() < threshold * body
        })
        .map(|(i, _)| i)
        .collect()
}

pub fn engulfing(bars: &[OhlcvBar]) -> EngulfingPatterns {
    let mut patterns = EngulfingPatterns::default();

    for (i, pair) in bars.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);

        if prev.is_bearish()
            && curr.is_bullish()
            && curr.open < prev.close
            && curr.close > prev.open
        {
            patterns.bullish.push(i + 1);
        }

        if prev.is_bullish()
            && curr.is_bearish()
            && curr.open > prev.close
            && curr.close < prev.open
        {
            patterns.bearish.push(i + 1);
        }
    }

    patterns
}

pub fn detect_patterns(bars: &[OhlcvBar]) -> CandlestickPatterns {
    CandlestickPatterns {
        doji: doji(bars, DEFAULT_DOJI_THRESHOLD),
        hammer: hammer(bars, DEFAULT_HAMMER_THRESHOLD),
        engulfing: engulfing(bars),
    }
}
