//! Core domain types and logic.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod indicator_helpers;
pub mod patterns;
pub mod signal;
pub mod analysis;
pub mod screener;
pub mod position;
pub mod portfolio;
pub mod universe;
pub mod config_validation;
pub mod error;
