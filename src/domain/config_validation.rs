//! Configuration validation.
//!
//! Checks every section before any data is loaded.

use crate::domain::error::AnalyzerError;
use crate::domain::screener::{parse_recommendations, ScreenCriteria};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub const ANALYSIS_PERIOD_KEYS: [&str; 8] = [
    "short_period",
    "long_period",
    "rsi_period",
    "volatility_period",
    "momentum_period",
    "sr_window",
    "trend_short",
    "trend_long",
];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_data(config)?;
    validate_universe(config)?;
    validate_analysis(config)?;
    screen_criteria(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> AnalyzerError {
    AnalyzerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(AnalyzerError::ConfigMissing {
                section: "data".to_string(),
                key: "dir".to_string(),
            })
        }
    }
    if config.get_int("data", "days", 1) <= 0 {
        return Err(invalid("data", "days", "days must be positive"));
    }
    Ok(())
}

fn validate_universe(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    if let Some(symbols) = config.get_string("universe", "symbols") {
        parse_symbols(&symbols).map_err(|e| invalid("universe", "symbols", e.to_string()))?;
    }
    Ok(())
}

fn validate_analysis(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    for key in ANALYSIS_PERIOD_KEYS {
        if config.get_int("analysis", key, 1) <= 0 {
            return Err(invalid("analysis", key, format!("{} must be positive", key)));
        }
    }

    let short = config.get_int("analysis", "short_period", 10);
    let long = config.get_int("analysis", "long_period", 20);
    if short >= long {
        return Err(invalid(
            "analysis",
            "short_period",
            "short_period must be less than long_period",
        ));
    }

    let trend_short = config.get_int("analysis", "trend_short", 10);
    let trend_long = config.get_int("analysis", "trend_long", 30);
    if trend_short >= trend_long {
        return Err(invalid(
            "analysis",
            "trend_short",
            "trend_short must be less than trend_long",
        ));
    }
    Ok(())
}

fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, AnalyzerError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid(section, key, format!("'{}' is not a number", s.trim()))),
    }
}

/// Read and check the `[screen]` section.
pub fn screen_criteria(config: &dyn ConfigPort) -> Result<ScreenCriteria, AnalyzerError> {
    let criteria = ScreenCriteria {
        min_price: optional_number(config, "screen", "min_price")?,
        max_price: optional_number(config, "screen", "max_price")?,
        min_rsi: optional_number(config, "screen", "min_rsi")?,
        max_rsi: optional_number(config, "screen", "max_rsi")?,
        recommendations: match config.get_string("screen", "recommendation") {
            Some(s) if !s.trim().is_empty() => Some(parse_recommendations(&s)?),
            _ => None,
        },
    };
    validate_criteria(&criteria)?;
    Ok(criteria)
}

/// Bounds checks shared by config-file and command-line criteria.
pub fn validate_criteria(criteria: &ScreenCriteria) -> Result<(), AnalyzerError> {
    for (key, value) in [("min_price", criteria.min_price), ("max_price", criteria.max_price)] {
        if value.is_some_and(|v| v < 0.0) {
            return Err(invalid("screen", key, format!("{} must be non-negative", key)));
        }
    }
    for (key, value) in [("min_rsi", criteria.min_rsi), ("max_rsi", criteria.max_rsi)] {
        if value.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
            return Err(invalid("screen", key, format!("{} must be between 0 and 100", key)));
        }
    }
    if let (Some(min), Some(max)) = (criteria.min_price, criteria.max_price) {
        if min > max {
            return Err(invalid("screen", "min_price", "min_price exceeds max_price"));
        }
    }
    if let (Some(min), Some(max)) = (criteria.min_rsi, criteria.max_rsi) {
        if min > max {
            return Err(invalid("screen", "min_rsi", "min_rsi exceeds max_rsi"));
        }
    }
    Ok(())
}
