#![allow(dead_code)]

use chrono::NaiveDate;
use nepse_analyzer::domain::error::AnalyzerError;
pub use nepse_analyzer::domain::ohlcv::OhlcvBar;
use nepse_analyzer::domain::price_series::PriceSeries;
use nepse_analyzer::ports::data_port::PriceSeriesProvider;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Deterministic provider that can also be told to fail for a symbol.
pub struct MockProvider {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceSeriesProvider for MockProvider {
    fn fetch(&self, symbol: &str, days: usize) -> Result<PriceSeries, AnalyzerError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AnalyzerError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(symbol)
            .ok_or_else(|| AnalyzerError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no data".into(),
            })?;
        let start = bars.len().saturating_sub(days);
        PriceSeries::new(symbol, bars[start..].to_vec())
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyzerError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bars on consecutive days from 2024-01-01, high/low one rupee either side
/// of the close and a flat volume.
pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10_000,
        })
        .collect()
}

pub fn with_volumes(mut bars: Vec<OhlcvBar>, volumes: &[u64]) -> Vec<OhlcvBar> {
    for (bar, &v) in bars.iter_mut().zip(volumes) {
        bar.volume = v;
    }
    bars
}

pub fn rising(n: usize, start: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64).collect()
}

pub fn falling(n: usize, start: f64) -> Vec<f64> {
    (0..n).map(|i| start - i as f64).collect()
}

pub fn write_price_csv(dir: &Path, symbol: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
