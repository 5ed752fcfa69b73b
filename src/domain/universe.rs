//! The tracked symbol universe.
//!
//! Parses symbol lists from configuration and loads a price series for every
//! member, skipping symbols the provider cannot supply.

use crate::domain::error::AnalyzerError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::PriceSeriesProvider;
use std::collections::HashSet;

/// Symbols tracked when the configuration names none.
pub const NEPSE_SYMBOLS: [&str; 12] = [
    "NABIL", "SCB", "EBL", "BOKL", "NICA", "PRVU", "GBIME", "CBL", "SANIMA", "MBL", "KBL", "ADBL",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    pub fn new(symbols: Vec<String>) -> Result<Self, UniverseError> {
        if symbols.is_empty() {
            return Err(UniverseError::Empty);
        }
        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(UniverseError::DuplicateSymbol(symbol.clone()));
            }
        }
        Ok(Self { symbols })
    }

    pub fn nepse() -> Self {
        Self {
            symbols: NEPSE_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::nepse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("symbol list is empty")]
    Empty,
}

/// Split a comma separated list into upper-cased symbols.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Err(UniverseError::Empty);
    }

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[derive(Debug)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: AnalyzerError,
}

pub struct LoadedUniverse {
    /// Series in universe order.
    pub series: Vec<PriceSeries>,
    pub skipped: Vec<SkippedSymbol>,
}

/// Fetch `days` bars for every symbol. Failures are logged and collected
/// rather than aborting the batch.
pub fn load_universe(
    provider: &dyn PriceSeriesProvider,
    universe: &Universe,
    days: usize,
) -> LoadedUniverse {
    let mut series = Vec::new();
    let mut skipped = Vec::new();

    for symbol in universe.symbols() {
        match provider.fetch(symbol, days) {
            Ok(s) if s.is_empty() => {
                log::warn!("skipping {} (no bars)", symbol);
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: AnalyzerError::InsufficientData {
                        symbol: symbol.clone(),
                        bars: 0,
                        minimum: 1,
                    },
                });
            }
            Ok(s) => {
                log::debug!("{}: {} bars", symbol, s.len());
                series.push(s);
            }
            Err(e) => {
                log::warn!("skipping {} ({})", symbol, e);
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: e,
                });
            }
        }
    }

    if !skipped.is_empty() {
        log::info!(
            "loaded {} of {} symbols",
            series.len(),
            series.len() + skipped.len()
        );
    }

    LoadedUniverse { series, skipped }
}
