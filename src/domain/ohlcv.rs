//! OHLCV bar representation.

use chrono::NaiveDate;

/// One daily trading bar.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// |close - open|
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}
