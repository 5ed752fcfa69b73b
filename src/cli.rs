//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{read_trades, CsvPriceProvider};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{Analysis, AnalysisConfig, Analyzer, MarketSummary};
use crate::domain::config_validation::{screen_criteria, validate_config, validate_criteria};
use crate::domain::error::AnalyzerError;
use crate::domain::portfolio::{PortfolioLedger, PortfolioReport};
use crate::domain::screener::ScreenCriteria;
use crate::domain::universe::{parse_symbols, Universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSeriesProvider;

#[derive(Parser, Debug)]
#[command(name = "nepse-analyzer", about = "Technical analysis for NEPSE equities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one symbol
    Analyze {
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
        /// Include recent history and the short-term trend
        #[arg(long)]
        detailed: bool,
    },
    /// Screen the universe
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Filters such as "min_rsi=30,max_rsi=70"; replaces the [screen] section
        #[arg(long)]
        criteria: Option<String>,
    },
    /// Value the positions built from a trades file
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        trades: PathBuf,
    },
    /// Advancing, declining and unchanged counts
    Summary {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the tracked symbols
    List {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            symbol,
            config,
            detailed,
        } => run_analyze(&config, &symbol, detailed),
        Command::Screen { config, criteria } => run_screen(&config, criteria.as_deref()),
        Command::Portfolio { config, trades } => run_portfolio(&config, &trades),
        Command::Summary { config } => run_summary(&config),
        Command::List { config } => run_list(&config),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, AnalyzerError> {
    log::info!("loading config from {}", path.display());
    let config = FileConfigAdapter::from_file(path)?;
    validate_config(&config)?;
    Ok(config)
}

fn period(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int("analysis", key, default as i64)).unwrap_or(default)
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> AnalysisConfig {
    let defaults = AnalysisConfig::default();
    AnalysisConfig {
        days: usize::try_from(config.get_int("data", "days", defaults.days as i64))
            .unwrap_or(defaults.days),
        short_period: period(config, "short_period", defaults.short_period),
        long_period: period(config, "long_period", defaults.long_period),
        rsi_period: period(config, "rsi_period", defaults.rsi_period),
        volatility_period: period(config, "volatility_period", defaults.volatility_period),
        momentum_period: period(config, "momentum_period", defaults.momentum_period),
        sr_window: period(config, "sr_window", defaults.sr_window),
        trend_short: period(config, "trend_short", defaults.trend_short),
        trend_long: period(config, "trend_long", defaults.trend_long),
    }
}

pub fn build_universe(config: &dyn ConfigPort) -> Result<Universe, AnalyzerError> {
    match config.get_string("universe", "symbols") {
        Some(list) => {
            let invalid = |e: crate::domain::universe::UniverseError| AnalyzerError::ConfigInvalid {
                section: "universe".into(),
                key: "symbols".into(),
                reason: e.to_string(),
            };
            Universe::new(parse_symbols(&list).map_err(invalid)?).map_err(invalid)
        }
        None => Ok(Universe::nepse()),
    }
}

pub fn build_provider(config: &dyn ConfigPort) -> Result<CsvPriceProvider, AnalyzerError> {
    let dir = config
        .get_string("data", "dir")
        .ok_or_else(|| AnalyzerError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    Ok(CsvPriceProvider::new(PathBuf::from(dir.trim())))
}

/// Command-line criteria replace the config file's `[screen]` section.
pub fn resolve_criteria(
    override_str: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<ScreenCriteria, AnalyzerError> {
    match override_str {
        Some(s) => {
            let criteria = ScreenCriteria::parse(s)?;
            validate_criteria(&criteria)?;
            Ok(criteria)
        }
        None => screen_criteria(config),
    }
}

fn with_analyzer<T>(
    config_path: &Path,
    f: impl FnOnce(&FileConfigAdapter, &Analyzer<'_>) -> Result<T, AnalyzerError>,
) -> Result<T, AnalyzerError> {
    let config = load_config(config_path)?;
    let provider = build_provider(&config)?;
    let analyzer = Analyzer::new(
        &provider as &dyn PriceSeriesProvider,
        build_universe(&config)?,
        build_analysis_config(&config),
    );
    f(&config, &analyzer)
}

fn run_analyze(config_path: &Path, symbol: &str, detailed: bool) -> Result<(), AnalyzerError> {
    let symbol = symbol.trim().to_uppercase();
    with_analyzer(config_path, |config, analyzer| {
        let detailed = detailed || config.get_bool("analysis", "detailed", false);
        let analysis = analyzer.analyze_symbol(&symbol, detailed)?;
        print!("{}", format_analysis(&analysis));
        Ok(())
    })
}

fn run_screen(config_path: &Path, criteria: Option<&str>) -> Result<(), AnalyzerError> {
    with_analyzer(config_path, |config, analyzer| {
        let criteria = resolve_criteria(criteria, config)?;
        let results = analyzer.screen(&criteria);
        println!("Found {} stocks matching criteria", results.len());
        for a in &results {
            println!("{}", format_screen_row(a));
        }
        Ok(())
    })
}

fn run_portfolio(config_path: &Path, trades_path: &Path) -> Result<(), AnalyzerError> {
    with_analyzer(config_path, |_, analyzer| {
        let trades = read_trades(trades_path)?;
        log::info!("applying {} trades from {}", trades.len(), trades_path.display());

        let ledger = PortfolioLedger::new(analyzer.universe().clone());
        for trade in &trades {
            match trade.date {
                Some(date) => ledger.buy_on(&trade.symbol, trade.quantity, trade.price, date)?,
                None => ledger.buy(&trade.symbol, trade.quantity, trade.price)?,
            };
        }

        let recommendations = analyzer.recommendations(&ledger.symbols());
        let report = ledger.performance_with(&analyzer.latest_prices(), &recommendations)?;
        print!("{}", format_report(&report));
        Ok(())
    })
}

fn run_summary(config_path: &Path) -> Result<(), AnalyzerError> {
    with_analyzer(config_path, |_, analyzer| {
        print!("{}", format_summary(&analyzer.market_summary()));
        Ok(())
    })
}

fn run_list(config_path: &Path) -> Result<(), AnalyzerError> {
    let config = load_config(config_path)?;
    let universe = build_universe(&config)?;
    let available = match build_provider(&config)?.list_symbols() {
        Ok(symbols) => symbols,
        Err(e) => {
            log::warn!("cannot list price data ({})", e);
            Vec::new()
        }
    };
    print!("{}", format_listing(&universe, &available));
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), AnalyzerError> {
    let config = load_config(config_path)?;
    let universe = build_universe(&config)?;
    let analysis = build_analysis_config(&config);
    println!("Configuration is valid.");
    println!("  universe: {} symbols", universe.count());
    println!("  history:  {} days", analysis.days);
    Ok(())
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

pub fn format_analysis(a: &Analysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} Analysis ({})\n", a.symbol, a.date));
    out.push_str(&format!("{}\n", "-".repeat(40)));
    out.push_str(&format!("Current Price: Rs. {:.2}\n", a.current_price));
    out.push_str(&format!(
        "Change: Rs. {:.2} ({:.2}%)\n",
        a.change, a.change_percent
    ));
    out.push_str(&format!("Volume: {}\n", a.volume));
    out.push_str(&format!("SMA(short): {}\n", opt(a.sma_short)));
    out.push_str(&format!("SMA(long): {}\n", opt(a.sma_long)));
    out.push_str(&format!("RSI: {}\n", opt(a.rsi)));
    out.push_str(&format!("Volatility: {}\n", opt(a.volatility)));
    out.push_str(&format!("Momentum: {:.2}%\n", a.momentum));
    out.push_str(&format!("Support: Rs. {:.2}\n", a.support));
    out.push_str(&format!("Resistance: Rs. {:.2}\n", a.resistance));
    if let Some(trend) = a.trend {
        out.push_str(&format!("Trend: {}\n", trend));
    }

    let signals = [
        ("RSI", a.signals.rsi),
        ("MACD", a.signals.macd),
        ("Moving Average", a.signals.moving_average),
    ];
    for (name, signal) in signals {
        if let Some(s) = signal {
            out.push_str(&format!("{} signal: {}\n", name, s));
        }
    }

    if !a.patterns.is_empty() {
        out.push_str(&format!(
            "Patterns: doji {:?}, hammer {:?}, bullish engulfing {:?}, bearish engulfing {:?}\n",
            a.patterns.doji,
            a.patterns.hammer,
            a.patterns.engulfing.bullish,
            a.patterns.engulfing.bearish
        ));
    }

    out.push_str(&format!("Recommendation: {}\n", a.recommendation));

    if let Some(detail) = &a.detail {
        let closes: Vec<String> = detail.closes.iter().map(|c| format!("{:.2}", c)).collect();
        out.push_str(&format!("Recent closes: {}\n", closes.join(", ")));
        let volumes: Vec<String> = detail.volumes.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("Recent volumes: {}\n", volumes.join(", ")));
        match detail.slope_trend {
            Some(t) => out.push_str(&format!("Short-term trend: {}\n", t)),
            None => out.push_str("Short-term trend: insufficient data\n"),
        }
    }
    out
}

/// Universe members in order, marking those the provider has no data for.
pub fn format_listing(universe: &Universe, available: &[String]) -> String {
    let mut out = format!("Available stocks ({}):\n", universe.count());
    for (i, symbol) in universe.symbols().iter().enumerate() {
        let marker = if available.contains(symbol) { "" } else { " (no data)" };
        out.push_str(&format!("  {:2}. {}{}\n", i + 1, symbol, marker));
    }
    out
}

pub fn format_screen_row(a: &Analysis) -> String {
    format!(
        "  {:<8} Rs. {:>10.2}  RSI {:>6}  {}",
        a.symbol,
        a.current_price,
        opt(a.rsi),
        a.recommendation
    )
}

pub fn format_report(report: &PortfolioReport) -> String {
    let mut out = String::new();
    out.push_str("Portfolio Performance\n");
    out.push_str(&format!("{}\n", "-".repeat(50)));
    out.push_str(&format!(
        "Total Investment: Rs. {:.2}\n",
        report.total_investment
    ));
    out.push_str(&format!("Current Value: Rs. {:.2}\n", report.current_value));
    out.push_str(&format!(
        "Total Gain/Loss: Rs. {:.2} ({:.2}%)\n",
        report.total_gain_loss, report.total_gain_loss_pct
    ));
    out.push_str("\nHoldings:\n");
    for h in &report.holdings {
        out.push_str(&format!(
            "  {}: {} shares @ Rs. {:.2} (now Rs. {:.2})\n",
            h.symbol, h.quantity, h.average_cost, h.current_price
        ));
        out.push_str(&format!(
            "     Investment: Rs. {:.2} | Current: Rs. {:.2}\n",
            h.investment, h.market_value
        ));
        out.push_str(&format!(
            "     Gain/Loss: Rs. {:.2} ({:.2}%)\n",
            h.gain_loss, h.gain_loss_pct
        ));
        if let Some(rec) = h.recommendation {
            out.push_str(&format!("     Recommendation: {}\n", rec));
        }
    }
    out
}

pub fn format_summary(summary: &MarketSummary) -> String {
    format!(
        "Market Summary\n\
         total_stocks: {}\n\
         advancing: {}\n\
         declining: {}\n\
         unchanged: {}\n\
         unavailable: {}\n",
        summary.total_symbols,
        summary.advancing,
        summary.declining,
        summary.unchanged,
        summary.unavailable
    )
}
