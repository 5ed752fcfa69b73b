//! Immutable, date-ordered OHLCV series for a single symbol.

use crate::domain::error::AnalyzerError;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    /// Build a series, rejecting bars that are out of date order or carry
    /// non-positive prices.
    pub fn new(symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, AnalyzerError> {
        let symbol = symbol.into();

        for (i, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(AnalyzerError::InvalidSeries {
                    symbol,
                    reason: format!("non-positive price on {}", bar.date),
                });
            }
            if bar.low > bar.high {
                return Err(AnalyzerError::InvalidSeries {
                    symbol,
                    reason: format!("low above high on {}", bar.date),
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(AnalyzerError::InvalidSeries {
                    symbol,
                    reason: format!("dates not strictly increasing at {}", bar.date),
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Latest close minus the previous close; 0 with fewer than two bars.
    pub fn latest_change(&self) -> f64 {
        match self.bars.len() {
            0 | 1 => 0.0,
            n => self.bars[n - 1].close - self.bars[n - 2].close,
        }
    }

    /// A copy holding only the trailing `days` bars.
    pub fn tail(&self, days: usize) -> PriceSeries {
        let start = self.bars.len().saturating_sub(days);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[start..].to_vec(),
        }
    }
}
