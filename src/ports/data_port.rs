//! Price data access port.

use crate::domain::error::AnalyzerError;
use crate::domain::price_series::PriceSeries;

pub trait PriceSeriesProvider {
    /// The trailing `days` bars for `symbol`, oldest first.
    ///
    /// Fails with `DataUnavailable` when the source has nothing for the symbol.
    fn fetch(&self, symbol: &str, days: usize) -> Result<PriceSeries, AnalyzerError>;

    /// Symbols this source can supply, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, AnalyzerError>;
}
