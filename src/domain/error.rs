//! Domain error types.

/// Top-level error type for the analyzer.
///
/// Every variant is recoverable: callers decide how to present it. Windows
/// that have not filled yet are not errors, they surface as invalid indicator
/// points instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("price data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("portfolio is empty")]
    EmptyPortfolio,

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AnalyzerError> for std::process::ExitCode {
    fn from(err: &AnalyzerError) -> Self {
        let code: u8 = match err {
            AnalyzerError::Io(_) => 1,
            AnalyzerError::ConfigParse { .. }
            | AnalyzerError::ConfigMissing { .. }
            | AnalyzerError::ConfigInvalid { .. } => 2,
            AnalyzerError::DataUnavailable { .. } | AnalyzerError::InvalidSeries { .. } => 3,
            AnalyzerError::UnknownSymbol { .. }
            | AnalyzerError::EmptyPortfolio
            | AnalyzerError::InvalidOrder { .. } => 4,
            AnalyzerError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
