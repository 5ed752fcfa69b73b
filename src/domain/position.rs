//! A held position with weighted-average cost basis.

use crate::domain::error::AnalyzerError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub quantity: u64,
    pub average_cost: f64,
    pub opened_on: NaiveDate,
}

impl Position {
    pub fn open(symbol: impl Into<String>, quantity: u64, price: f64, date: NaiveDate) -> Self {
        Position {
            symbol: symbol.into(),
            quantity,
            average_cost: price,
            opened_on: date,
        }
    }

    /// Fold another lot into the position. `opened_on` keeps the first buy date.
    ///
    /// Fails with `InvalidOrder`, leaving the position unchanged, when the
    /// combined quantity overflows.
    pub fn add_lot(&mut self, quantity: u64, price: f64) -> Result<(), AnalyzerError> {
        let total_quantity =
            self.quantity
                .checked_add(quantity)
                .ok_or_else(|| AnalyzerError::InvalidOrder {
                    reason: format!("quantity for {} overflows the position", self.symbol),
                })?;
        let total_cost = self.quantity as f64 * self.average_cost + quantity as f64 * price;
        self.average_cost = total_cost / total_quantity as f64;
        self.quantity = total_quantity;
        Ok(())
    }

    pub fn investment(&self) -> f64 {
        self.quantity as f64 * self.average_cost
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.market_value(price) - self.investment()
    }
}
