//! In-memory portfolio ledger.
//!
//! Buys take the write lock; performance reports take the read lock, so
//! reports may run alongside each other but never during a buy.

use chrono::{NaiveDate, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::error::AnalyzerError;
use super::position::Position;
use super::signal::Recommendation;
use super::universe::Universe;

#[derive(Debug, Clone, PartialEq)]
pub struct HoldingReport {
    pub symbol: String,
    pub quantity: u64,
    pub average_cost: f64,
    pub current_price: f64,
    pub investment: f64,
    pub market_value: f64,
    pub gain_loss: f64,
    pub gain_loss_pct: f64,
    /// Current recommendation for the symbol, when one could be computed.
    pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    /// Sorted by symbol.
    pub holdings: Vec<HoldingReport>,
    pub total_investment: f64,
    pub current_value: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_pct: f64,
}

fn pct(gain: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        gain / base * 100.0
    }
}

#[derive(Debug)]
pub struct PortfolioLedger {
    universe: Universe,
    positions: RwLock<HashMap<String, Position>>,
}

impl PortfolioLedger {
    pub fn new(universe: Universe) -> Self {
        PortfolioLedger {
            universe,
            positions: RwLock::new(HashMap::new()),
        }
    }

    /// Buy dated today.
    pub fn buy(&self, symbol: &str, quantity: u64, price: f64) -> Result<Position, AnalyzerError> {
        self.buy_on(symbol, quantity, price, Utc::now().date_naive())
    }

    /// Record a buy. `date` only applies when the buy opens a new position.
    pub fn buy_on(
        &self,
        symbol: &str,
        quantity: u64,
        price: f64,
        date: NaiveDate,
    ) -> Result<Position, AnalyzerError> {
        if !self.universe.contains(symbol) {
            return Err(AnalyzerError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }
        if quantity == 0 {
            return Err(AnalyzerError::InvalidOrder {
                reason: format!("quantity for {} must be positive", symbol),
            });
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(AnalyzerError::InvalidOrder {
                reason: format!("price for {} must be positive, got {}", symbol, price),
            });
        }

        let mut positions = self.positions.write().unwrap_or_else(PoisonError::into_inner);
        let position = match positions.entry(symbol.to_string()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.add_lot(quantity, price)?;
                existing
            }
            Entry::Vacant(entry) => entry.insert(Position::open(symbol, quantity, price, date)),
        };

        log::info!(
            "bought {} {} @ {:.2}; holding {} @ {:.2}",
            quantity,
            symbol,
            price,
            position.quantity,
            position.average_cost
        );
        Ok(position.clone())
    }

    pub fn position(&self, symbol: &str) -> Option<Position> {
        self.positions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .cloned()
    }

    pub fn position_count(&self) -> usize {
        self.positions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.position_count() == 0
    }

    /// Held symbols, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .positions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        symbols.sort();
        symbols
    }

    /// Value every position at `prices`.
    ///
    /// Fails with `EmptyPortfolio` when nothing is held and with
    /// `DataUnavailable` when a held symbol has no price.
    pub fn performance(&self, prices: &HashMap<String, f64>) -> Result<PortfolioReport, AnalyzerError> {
        self.performance_with(prices, &HashMap::new())
    }

    /// As [`performance`](Self::performance), tagging each holding with its
    /// entry in `recommendations`.
    pub fn performance_with(
        &self,
        prices: &HashMap<String, f64>,
        recommendations: &HashMap<String, Recommendation>,
    ) -> Result<PortfolioReport, AnalyzerError> {
        let positions = self.positions.read().unwrap_or_else(PoisonError::into_inner);
        if positions.is_empty() {
            return Err(AnalyzerError::EmptyPortfolio);
        }

        let mut holdings = positions
            .values()
            .map(|pos| {
                let current_price =
                    *prices
                        .get(&pos.symbol)
                        .ok_or_else(|| AnalyzerError::DataUnavailable {
                            symbol: pos.symbol.clone(),
                            reason: "no current price".into(),
                        })?;
                let investment = pos.investment();
                let gain_loss = pos.unrealized_pnl(current_price);
                Ok(HoldingReport {
                    symbol: pos.symbol.clone(),
                    quantity: pos.quantity,
                    average_cost: pos.average_cost,
                    current_price,
                    investment,
                    market_value: pos.market_value(current_price),
                    gain_loss,
                    gain_loss_pct: pct(gain_loss, investment),
                    recommendation: recommendations.get(&pos.symbol).copied(),
                })
            })
            .collect::<Result<Vec<_>, AnalyzerError>>()?;
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let total_investment: f64 = holdings.iter().map(|h| h.investment).sum();
        let current_value: f64 = holdings.iter().map(|h| h.market_value).sum();
        let total_gain_loss = current_value - total_investment;

        Ok(PortfolioReport {
            holdings,
            total_investment,
            current_value,
            total_gain_loss,
            total_gain_loss_pct: pct(total_gain_loss, total_investment),
        })
    }
}
