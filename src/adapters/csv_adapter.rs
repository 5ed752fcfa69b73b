//! CSV file price provider and trade-list reader.
//!
//! Prices: one file per symbol, `<dir>/<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume` and ISO dates.
//!
//! Trades: `symbol,quantity,price[,date]` with a header row.

use crate::domain::error::AnalyzerError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::PriceSeriesProvider;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CsvPriceProvider {
    base_path: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn field<T>(record: &csv::StringRecord, idx: usize, name: &str, symbol: &str) -> Result<T, AnalyzerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record.get(idx).ok_or_else(|| AnalyzerError::DataUnavailable {
        symbol: symbol.to_string(),
        reason: format!("missing {} column", name),
    })?;
    raw.trim().parse().map_err(|e: T::Err| AnalyzerError::DataUnavailable {
        symbol: symbol.to_string(),
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

impl PriceSeriesProvider for CsvPriceProvider {
    fn fetch(&self, symbol: &str, days: usize) -> Result<PriceSeries, AnalyzerError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| AnalyzerError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| AnalyzerError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str: String = field(&record, 0, "date", symbol)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                AnalyzerError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            bars.push(OhlcvBar {
                date,
                open: field(&record, 1, "open", symbol)?,
                high: field(&record, 2, "high", symbol)?,
                low: field(&record, 3, "low", symbol)?,
                close: field(&record, 4, "close", symbol)?,
                volume: field(&record, 5, "volume", symbol)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        let start = bars.len().saturating_sub(days);
        log::debug!("{}: read {} bars from {}", symbol, bars.len(), path.display());
        PriceSeries::new(symbol, bars.split_off(start))
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyzerError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// One buy from a trades file.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub symbol: String,
    pub quantity: u64,
    pub price: f64,
    pub date: Option<NaiveDate>,
}

fn trade_field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, AnalyzerError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AnalyzerError::InvalidOrder {
            reason: format!("line {}: missing {}", line, name),
        })
}

pub fn read_trades(path: &Path) -> Result<Vec<TradeRecord>, AnalyzerError> {
    let content = fs::read_to_string(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut trades = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| AnalyzerError::InvalidOrder {
            reason: format!("trades CSV parse error: {}", e),
        })?;
        let line = record.position().map_or(0, |p| p.line());

        let symbol = trade_field(&record, 0, "symbol", line)?.to_uppercase();
        let quantity = trade_field(&record, 1, "quantity", line)?
            .parse::<u64>()
            .map_err(|e| AnalyzerError::InvalidOrder {
                reason: format!("line {}: invalid quantity: {}", line, e),
            })?;
        let price = trade_field(&record, 2, "price", line)?
            .parse::<f64>()
            .map_err(|e| AnalyzerError::InvalidOrder {
                reason: format!("line {}: invalid price: {}", line, e),
            })?;
        let date = match record.get(3).map(str::trim).filter(|s| !s.is_empty()) {
            Some(d) => Some(NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|e| {
                AnalyzerError::InvalidOrder {
                    reason: format!("line {}: invalid date: {}", line, e),
                }
            })?),
            None => None,
        };

        trades.push(TradeRecord {
            symbol,
            quantity,
            price,
            date,
        });
    }

    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";

        fs::write(path.join("NABIL.csv"), csv_content).unwrap();
        fs::write(path.join("SCB.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let provider = CsvPriceProvider::new(path);

        let series = provider.fetch("NABIL", 30).unwrap();
        let bars = series.bars();

        assert_eq!(series.symbol(), "NABIL");
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
    }

    #[test]
    fn fetch_keeps_trailing_days() {
        let (_dir, path) = setup_test_data();
        let provider = CsvPriceProvider::new(path);

        let series = provider.fetch("NABIL", 2).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
    }

    #[test]
    fn fetch_missing_file_is_data_unavailable() {
        let (_dir, path) = setup_test_data();
        let provider = CsvPriceProvider::new(path);

        let result = provider.fetch("XYZ", 30);
        assert!(matches!(result, Err(AnalyzerError::DataUnavailable { .. })));
    }

    #[test]
    fn fetch_rejects_bad_numbers() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("EBL.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,110.0,90.0,105.0,50000\n",
        )
        .unwrap();
        let provider = CsvPriceProvider::new(path);

        let err = provider.fetch("EBL", 30).unwrap_err();
        assert!(err.to_string().contains("invalid open value"));
    }

    #[test]
    fn fetch_rejects_duplicate_dates() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("EBL.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n",
        )
        .unwrap();
        let provider = CsvPriceProvider::new(path);

        assert!(matches!(
            provider.fetch("EBL", 30),
            Err(AnalyzerError::InvalidSeries { .. })
        ));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let provider = CsvPriceProvider::new(path);

        assert_eq!(provider.list_symbols().unwrap(), vec!["NABIL", "SCB"]);
    }

    #[test]
    fn read_trades_with_and_without_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        fs::write(
            &path,
            "symbol,quantity,price,date\n\
             nabil,100,500,2024-01-10\n\
             SCB, 50 , 412.5\n",
        )
        .unwrap();

        let trades = read_trades(&path).unwrap();
        assert_eq!(
            trades,
            vec![
                TradeRecord {
                    symbol: "NABIL".into(),
                    quantity: 100,
                    price: 500.0,
                    date: NaiveDate::from_ymd_opt(2024, 1, 10),
                },
                TradeRecord {
                    symbol: "SCB".into(),
                    quantity: 50,
                    price: 412.5,
                    date: None,
                },
            ]
        );
    }

    #[test]
    fn read_trades_rejects_negative_quantity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        fs::write(&path, "symbol,quantity,price\nNABIL,-5,500\n").unwrap();

        let err = read_trades(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidOrder { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn read_trades_missing_file_is_io() {
        let result = read_trades(Path::new("/nonexistent/trades.csv"));
        assert!(matches!(result, Err(AnalyzerError::Io(_))));
    }
}
