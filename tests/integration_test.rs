//! End-to-end analysis tests over a mock price provider.

mod common;

use approx::assert_relative_eq;
use common::*;
use nepse_analyzer::domain::analysis::{AnalysisConfig, Analyzer, MarketSummary};
use nepse_analyzer::domain::error::AnalyzerError;
use nepse_analyzer::domain::indicator::TrendDirection;
use nepse_analyzer::domain::portfolio::PortfolioLedger;
use nepse_analyzer::domain::screener::ScreenCriteria;
use nepse_analyzer::domain::signal::{Recommendation, RecommendationStrategy, SignalInput};
use nepse_analyzer::domain::universe::Universe;

const EPSILON: f64 = 1e-9;

fn universe(symbols: &[&str]) -> Universe {
    Universe::new(symbols.iter().map(|s| s.to_string()).collect()).unwrap()
}

fn surge(bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
    let n = bars.len();
    let mut volumes = vec![10_000; n];
    volumes[n - 1] = 60_000;
    with_volumes(bars, &volumes)
}

/// NABIL rising, SCB falling, EBL flat, HBL rising on a volume surge.
fn market() -> MockProvider {
    MockProvider::new()
        .with_bars("NABIL", make_bars(&rising(30, 621.0)))
        .with_bars("SCB", make_bars(&falling(30, 450.0)))
        .with_bars("EBL", make_bars(&[300.0; 30]))
        .with_bars("HBL", surge(make_bars(&rising(30, 200.0))))
}

mod analyze_pipeline {
    use super::*;

    #[test]
    fn rising_symbol_end_to_end() {
        let provider = market();
        let analyzer = Analyzer::new(&provider, universe(&["NABIL"]), AnalysisConfig::default());

        let a = analyzer.analyze_symbol("NABIL", false).unwrap();
        assert_eq!(a.symbol, "NABIL");
        assert_eq!(a.date, date(2024, 1, 30));
        assert!((a.current_price - 650.0).abs() < EPSILON);
        assert!((a.change - 1.0).abs() < EPSILON);
        assert!((a.sma_short.unwrap() - 645.5).abs() < EPSILON);
        assert!((a.sma_long.unwrap() - 640.5).abs() < EPSILON);
        assert!((a.rsi.unwrap() - 100.0).abs() < EPSILON);
        // Overbought RSI cancels the bullish crossover.
        assert_eq!(a.recommendation, Recommendation::Hold);
        assert_eq!(a.trend, Some(TrendDirection::StrongUptrend));
        assert!(a.detail.is_none());
    }

    #[test]
    fn detailed_analysis_keeps_recent_history() {
        let provider = market();
        let analyzer = Analyzer::new(&provider, universe(&["NABIL"]), AnalysisConfig::default());

        let a = analyzer.analyze_symbol("NABIL", true).unwrap();
        let detail = a.detail.unwrap();
        assert_eq!(detail.closes.len(), 10);
        assert!((detail.closes[9] - 650.0).abs() < EPSILON);
        assert_eq!(detail.volumes, vec![10_000; 10]);
        assert!(detail.slope_trend.is_some());
    }

    #[test]
    fn volume_surge_on_up_day_is_strong_buy() {
        let provider = market();
        let analyzer = Analyzer::new(&provider, universe(&["HBL"]), AnalysisConfig::default());

        let a = analyzer.analyze_symbol("HBL", false).unwrap();
        assert_eq!(a.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn short_history_leaves_indicators_undefined() {
        let provider = MockProvider::new().with_bars("NABIL", make_bars(&[500.0, 505.0, 502.0]));
        let analyzer = Analyzer::new(&provider, universe(&["NABIL"]), AnalysisConfig::default());

        let a = analyzer.analyze_symbol("NABIL", false).unwrap();
        assert!(a.sma_short.is_none());
        assert!(a.rsi.is_none());
        assert!(a.trend.is_none());
        assert_eq!(a.recommendation, Recommendation::Hold);
    }

    #[test]
    fn days_limits_the_window() {
        let provider = market();
        let config = AnalysisConfig {
            days: 5,
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(&provider, universe(&["NABIL"]), config);

        let a = analyzer.analyze_symbol("NABIL", true).unwrap();
        assert_eq!(a.detail.unwrap().closes.len(), 5);
        assert!(a.sma_short.is_none());
    }

    #[test]
    fn unknown_symbol_is_rejected_before_fetch() {
        let provider = market();
        let analyzer = Analyzer::new(&provider, universe(&["NABIL"]), AnalysisConfig::default());

        assert!(matches!(
            analyzer.analyze_symbol("SCB", false),
            Err(AnalyzerError::UnknownSymbol { symbol }) if symbol == "SCB"
        ));
    }

    #[test]
    fn provider_failure_propagates() {
        let provider = market().with_error("NABIL", "feed down");
        let analyzer = Analyzer::new(&provider, universe(&["NABIL"]), AnalysisConfig::default());

        let err = analyzer.analyze_symbol("NABIL", false).unwrap_err();
        assert!(matches!(err, AnalyzerError::DataUnavailable { .. }));
        assert!(err.to_string().contains("feed down"));
    }

    struct AlwaysSell;

    impl RecommendationStrategy for AlwaysSell {
        fn name(&self) -> &str {
            "always-sell"
        }

        fn recommend(&self, _input: &SignalInput<'_>) -> Recommendation {
            Recommendation::Sell
        }
    }

    #[test]
    fn custom_strategy_replaces_vote_count() {
        let provider = market();
        let analyzer = Analyzer::new(&provider, universe(&["HBL"]), AnalysisConfig::default())
            .with_strategy(Box::new(AlwaysSell));

        let a = analyzer.analyze_symbol("HBL", false).unwrap();
        assert_eq!(a.recommendation, Recommendation::Sell);
    }
}

mod screening {
    use super::*;

    #[test]
    fn empty_criteria_returns_every_available_symbol() {
        let provider = market();
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "SCB", "EBL", "HBL", "NICA"]),
            AnalysisConfig::default(),
        );

        let results = analyzer.screen(&ScreenCriteria::default());
        let symbols: Vec<&str> = results.iter().map(|a| a.symbol.as_str()).collect();
        // StrongBuy first, then the Holds in universe order.
        assert_eq!(symbols, vec!["HBL", "NABIL", "SCB", "EBL"]);
    }

    #[test]
    fn rsi_band_excludes_extremes() {
        let provider = market();
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "SCB", "EBL"]),
            AnalysisConfig::default(),
        );

        let criteria = ScreenCriteria::parse("min_rsi=30,max_rsi=70").unwrap();
        let results = analyzer.screen(&criteria);
        // Rising is 100, falling is 0, flat has no defined RSI.
        assert!(results.is_empty());
    }

    #[test]
    fn price_and_recommendation_filters() {
        let provider = market();
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "SCB", "EBL", "HBL"]),
            AnalysisConfig::default(),
        );

        let criteria = ScreenCriteria::parse("max_price=500,recommendation=HOLD").unwrap();
        let symbols: Vec<String> = analyzer
            .screen(&criteria)
            .into_iter()
            .map(|a| a.symbol)
            .collect();
        assert_eq!(symbols, vec!["SCB", "EBL"]);

        let buys = ScreenCriteria::parse("recommendation=BUY|STRONG_BUY").unwrap();
        let results = analyzer.screen(&buys);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "HBL");
    }
}

mod market_summary {
    use super::*;

    #[test]
    fn counts_moves_and_unavailable() {
        let provider = market().with_error("HBL", "corrupt file");
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "SCB", "EBL", "HBL", "NICA"]),
            AnalysisConfig::default(),
        );

        assert_eq!(
            analyzer.market_summary(),
            MarketSummary {
                total_symbols: 5,
                advancing: 1,
                declining: 1,
                unchanged: 1,
                unavailable: 2,
            }
        );
    }
}

mod portfolio {
    use super::*;

    #[test]
    fn ledger_valued_at_latest_prices() {
        let provider = market();
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "SCB"]),
            AnalysisConfig::default(),
        );
        let ledger = PortfolioLedger::new(analyzer.universe().clone());
        ledger.buy_on("NABIL", 100, 500.0, date(2024, 1, 2)).unwrap();
        ledger.buy_on("NABIL", 100, 700.0, date(2024, 1, 3)).unwrap();

        let report = ledger.performance(&analyzer.latest_prices()).unwrap();
        assert_eq!(report.holdings.len(), 1);
        let nabil = &report.holdings[0];
        assert_eq!(nabil.quantity, 200);
        assert_relative_eq!(nabil.average_cost, 600.0);
        assert_relative_eq!(nabil.current_price, 650.0);
        assert_relative_eq!(report.total_investment, 120_000.0);
        assert_relative_eq!(report.current_value, 130_000.0);
        assert_relative_eq!(report.total_gain_loss, 10_000.0);
        assert_relative_eq!(report.total_gain_loss_pct, 10_000.0 / 120_000.0 * 100.0);
    }

    #[test]
    fn holdings_carry_current_recommendation() {
        let provider = market();
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "HBL", "NICA"]),
            AnalysisConfig::default(),
        );
        let ledger = PortfolioLedger::new(analyzer.universe().clone());
        ledger.buy_on("HBL", 50, 220.0, date(2024, 1, 2)).unwrap();
        ledger.buy_on("NABIL", 10, 640.0, date(2024, 1, 2)).unwrap();

        let recommendations = analyzer.recommendations(&ledger.symbols());
        let report = ledger
            .performance_with(&analyzer.latest_prices(), &recommendations)
            .unwrap();

        let tags: Vec<(&str, Option<Recommendation>)> = report
            .holdings
            .iter()
            .map(|h| (h.symbol.as_str(), h.recommendation))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("HBL", Some(Recommendation::StrongBuy)),
                ("NABIL", Some(Recommendation::Hold)),
            ]
        );
    }

    #[test]
    fn recommendations_skip_symbols_without_data() {
        let provider = market();
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "NICA"]),
            AnalysisConfig::default(),
        );

        let recommendations = analyzer.recommendations(&["NABIL".into(), "NICA".into()]);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations.get("NABIL"), Some(&Recommendation::Hold));
    }

    #[test]
    fn missing_price_fails_valuation() {
        let provider = market().with_error("SCB", "no file");
        let analyzer = Analyzer::new(
            &provider,
            universe(&["NABIL", "SCB"]),
            AnalysisConfig::default(),
        );
        let ledger = PortfolioLedger::new(analyzer.universe().clone());
        ledger.buy_on("SCB", 10, 400.0, date(2024, 1, 2)).unwrap();

        assert!(matches!(
            ledger.performance(&analyzer.latest_prices()),
            Err(AnalyzerError::DataUnavailable { symbol, .. }) if symbol == "SCB"
        ));
    }

    #[test]
    fn buy_outside_universe_is_rejected() {
        let ledger = PortfolioLedger::new(universe(&["NABIL"]));
        assert!(matches!(
            ledger.buy("SCB", 10, 400.0),
            Err(AnalyzerError::UnknownSymbol { .. })
        ));
        assert!(ledger.is_empty());
    }
}
