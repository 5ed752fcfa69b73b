//! Filtering and ranking of per-symbol analyses.

use crate::domain::analysis::Analysis;
use crate::domain::error::AnalyzerError;
use crate::domain::signal::Recommendation;

/// Optional filters; an unset filter places no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenCriteria {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rsi: Option<f64>,
    pub max_rsi: Option<f64>,
    pub recommendations: Option<Vec<Recommendation>>,
}

fn invalid(key: &str, reason: String) -> AnalyzerError {
    AnalyzerError::ConfigInvalid {
        section: "screen".into(),
        key: key.into(),
        reason,
    }
}

fn parse_number(key: &str, value: &str) -> Result<f64, AnalyzerError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(key, format!("'{}' is not a number", value)))
}

/// Recommendation names separated by `|` or `,`.
pub fn parse_recommendations(value: &str) -> Result<Vec<Recommendation>, AnalyzerError> {
    value
        .split(['|', ','])
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse().map_err(|e| invalid("recommendation", e)))
        .collect()
}

impl ScreenCriteria {
    /// Parse `key=value` pairs separated by commas, e.g.
    /// `min_rsi=30,max_rsi=70,recommendation=BUY|STRONG_BUY`.
    /// Blank input means no filters.
    pub fn parse(input: &str) -> Result<Self, AnalyzerError> {
        let mut criteria = ScreenCriteria::default();

        for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| invalid(item, "expected key=value".into()))?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "min_price" => criteria.min_price = Some(parse_number(key, value)?),
                "max_price" => criteria.max_price = Some(parse_number(key, value)?),
                "min_rsi" => criteria.min_rsi = Some(parse_number(key, value)?),
                "max_rsi" => criteria.max_rsi = Some(parse_number(key, value)?),
                "recommendation" => criteria.recommendations = Some(parse_recommendations(value)?),
                _ => return Err(invalid(key, "unknown criterion".into())),
            }
        }

        Ok(criteria)
    }

    pub fn is_empty(&self) -> bool {
        *self == ScreenCriteria::default()
    }

    /// True when `analysis` passes every set filter. An undefined RSI fails
    /// any RSI filter.
    pub fn matches(&self, analysis: &Analysis) -> bool {
        let price = analysis.current_price;
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if self.min_rsi.is_some() || self.max_rsi.is_some() {
            let Some(rsi) = analysis.rsi else {
                return false;
            };
            if self.min_rsi.is_some_and(|min| rsi < min) {
                return false;
            }
            if self.max_rsi.is_some_and(|max| rsi > max) {
                return false;
            }
        }

        match &self.recommendations {
            Some(allowed) => allowed.contains(&analysis.recommendation),
            None => true,
        }
    }
}

/// Keep the analyses passing `criteria`, strongest recommendation first.
/// Equal recommendations keep their input order.
pub fn screen(analyses: Vec<Analysis>, criteria: &ScreenCriteria) -> Vec<Analysis> {
    let mut results: Vec<Analysis> = analyses.into_iter().filter(|a| criteria.matches(a)).collect();
    results.sort_by(|a, b| b.recommendation.cmp(&a.recommendation));
    results
}
