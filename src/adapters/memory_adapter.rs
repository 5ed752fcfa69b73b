//! In-memory price provider backed by fixed fixtures.

use crate::domain::error::AnalyzerError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::PriceSeriesProvider;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: BTreeMap<String, PriceSeries>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any series already held for the same symbol.
    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }
}

impl PriceSeriesProvider for InMemoryProvider {
    fn fetch(&self, symbol: &str, days: usize) -> Result<PriceSeries, AnalyzerError> {
        self.series
            .get(symbol)
            .map(|s| s.tail(days))
            .ok_or_else(|| AnalyzerError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no fixture loaded".into(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyzerError> {
        Ok(self.series.keys().cloned().collect())
    }
}
