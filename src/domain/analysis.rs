//! Per-symbol analysis and the batch operations built on it.

use crate::domain::error::AnalyzerError;
use crate::domain::indicator::{
    calculate_rsi, calculate_sma, momentum, slope_trend, support_resistance, trend_direction,
    volatility, SlopeTrend, SupportResistance, TrendDirection,
};
use crate::domain::patterns::{detect_patterns, CandlestickPatterns};
use crate::domain::price_series::PriceSeries;
use crate::domain::screener::{screen, ScreenCriteria};
use crate::domain::signal::{
    generate_trading_signals, IndicatorSignals, Recommendation, RecommendationStrategy,
    SignalInput, VoteCountStrategy,
};
use crate::domain::universe::{load_universe, Universe};
use crate::ports::data_port::PriceSeriesProvider;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Trailing bars kept in a detailed analysis.
pub const DETAIL_HISTORY: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub days: usize,
    pub short_period: usize,
    pub long_period: usize,
    pub rsi_period: usize,
    pub volatility_period: usize,
    pub momentum_period: usize,
    pub sr_window: usize,
    pub trend_short: usize,
    pub trend_long: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            days: 60,
            short_period: 10,
            long_period: 20,
            rsi_period: 14,
            volatility_period: 20,
            momentum_period: 5,
            sr_window: 5,
            trend_short: 10,
            trend_long: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisDetail {
    pub closes: Vec<f64>,
    pub volumes: Vec<u64>,
    pub slope_trend: Option<SlopeTrend>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub symbol: String,
    pub date: NaiveDate,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub volatility: Option<f64>,
    pub momentum: f64,
    pub support: f64,
    pub resistance: f64,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    pub recommendation: Recommendation,
    pub trend: Option<TrendDirection>,
    pub signals: IndicatorSignals,
    pub patterns: CandlestickPatterns,
    pub detail: Option<AnalysisDetail>,
}

/// Run every indicator over `series` and aggregate the result.
///
/// Fails only for an empty series; indicators whose window has not filled
/// are reported as `None`.
pub fn analyze(
    series: &PriceSeries,
    config: &AnalysisConfig,
    strategy: &dyn RecommendationStrategy,
    detailed: bool,
) -> Result<Analysis, AnalyzerError> {
    let symbol = series.symbol();
    let bars = series.bars();
    let latest = series.latest().ok_or_else(|| AnalyzerError::InsufficientData {
        symbol: symbol.to_string(),
        bars: 0,
        minimum: 1,
    })?;

    let current_price = latest.close;
    let change = series.latest_change();
    let sma_short = calculate_sma(bars, config.short_period).latest_simple();
    let sma_long = calculate_sma(bars, config.long_period).latest_simple();
    let rsi = calculate_rsi(bars, config.rsi_period).latest_simple();
    let volumes = series.volumes();

    let recommendation = strategy.recommend(&SignalInput {
        price: current_price,
        price_change: change,
        rsi,
        short_sma: sma_short,
        long_sma: sma_long,
        volumes: &volumes,
    });

    // Non-empty series always yields levels.
    let levels = support_resistance(bars, config.sr_window).unwrap_or_else(|| SupportResistance {
        support: current_price,
        resistance: current_price,
        support_levels: Vec::new(),
        resistance_levels: Vec::new(),
    });

    let detail = detailed.then(|| {
        let start = bars.len().saturating_sub(DETAIL_HISTORY);
        AnalysisDetail {
            closes: bars[start..].iter().map(|b| b.close).collect(),
            volumes: volumes[start..].to_vec(),
            slope_trend: slope_trend(bars),
        }
    });

    log::debug!(
        "{}: price={} rsi={:?} recommendation={} via {}",
        symbol,
        current_price,
        rsi,
        recommendation,
        strategy.name()
    );

    Ok(Analysis {
        symbol: symbol.to_string(),
        date: latest.date,
        current_price,
        change,
        change_percent: change / current_price * 100.0,
        volume: latest.volume,
        sma_short,
        sma_long,
        rsi,
        volatility: volatility(bars, config.volatility_period),
        momentum: momentum(bars, config.momentum_period),
        support: levels.support,
        resistance: levels.resistance,
        support_levels: levels.support_levels,
        resistance_levels: levels.resistance_levels,
        recommendation,
        trend: trend_direction(bars, config.trend_short, config.trend_long),
        signals: generate_trading_signals(bars),
        patterns: detect_patterns(bars),
        detail,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketSummary {
    pub total_symbols: usize,
    pub advancing: usize,
    pub declining: usize,
    pub unchanged: usize,
    pub unavailable: usize,
}

/// Analysis service over a price source and a symbol universe.
pub struct Analyzer<'a> {
    provider: &'a dyn PriceSeriesProvider,
    universe: Universe,
    config: AnalysisConfig,
    strategy: Box<dyn RecommendationStrategy>,
}

impl<'a> Analyzer<'a> {
    pub fn new(provider: &'a dyn PriceSeriesProvider, universe: Universe, config: AnalysisConfig) -> Self {
        Self {
            provider,
            universe,
            config,
            strategy: Box::new(VoteCountStrategy::default()),
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn RecommendationStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze_symbol(&self, symbol: &str, detailed: bool) -> Result<Analysis, AnalyzerError> {
        if !self.universe.contains(symbol) {
            return Err(AnalyzerError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }
        let series = self.provider.fetch(symbol, self.config.days)?;
        analyze(&series, &self.config, self.strategy.as_ref(), detailed)
    }

    /// Analyses in universe order; symbols without data are skipped.
    pub fn analyze_universe(&self) -> Vec<Analysis> {
        log::info!("analyzing {} symbols", self.universe.count());
        let loaded = load_universe(self.provider, &self.universe, self.config.days);
        loaded
            .series
            .iter()
            .filter_map(|series| {
                match analyze(series, &self.config, self.strategy.as_ref(), false) {
                    Ok(a) => Some(a),
                    Err(e) => {
                        log::warn!("skipping {} ({})", series.symbol(), e);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn screen(&self, criteria: &ScreenCriteria) -> Vec<Analysis> {
        let analyses = self.analyze_universe();
        let results = screen(analyses, criteria);
        log::info!("{} symbols matched screen", results.len());
        results
    }

    /// Current recommendation per symbol. Symbols that cannot be analyzed
    /// are left out.
    pub fn recommendations(&self, symbols: &[String]) -> HashMap<String, Recommendation> {
        symbols
            .iter()
            .filter_map(|symbol| match self.analyze_symbol(symbol, false) {
                Ok(a) => Some((a.symbol, a.recommendation)),
                Err(e) => {
                    log::warn!("no recommendation for {} ({})", symbol, e);
                    None
                }
            })
            .collect()
    }

    /// Latest close per symbol, for valuing a portfolio.
    pub fn latest_prices(&self) -> HashMap<String, f64> {
        load_universe(self.provider, &self.universe, self.config.days)
            .series
            .iter()
            .filter_map(|s| s.latest().map(|b| (s.symbol().to_string(), b.close)))
            .collect()
    }

    pub fn market_summary(&self) -> MarketSummary {
        let loaded = load_universe(self.provider, &self.universe, self.config.days);
        let mut summary = MarketSummary {
            total_symbols: self.universe.count(),
            unavailable: loaded.skipped.len(),
            ..MarketSummary::default()
        };

        for series in &loaded.series {
            let change = series.latest_change();
            if change > 0.0 {
                summary.advancing += 1;
            } else if change < 0.0 {
                summary.declining += 1;
            } else {
                summary.unchanged += 1;
            }
        }

        summary
    }
}
