//! Domain error types.

/// Why a single ticker was left out of a screening run.
///
/// None of these abort a batch; the driver records them and moves on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("missing financial statements or balance sheet")]
    MissingStatements,

    #[error("fewer than two fiscal years in statement columns")]
    InsufficientYears,

    #[error("{0} row not found")]
    RowNotFound(&'static str),

    #[error("no {item} value for {year}")]
    MissingValue { item: &'static str, year: i32 },

    #[error("capital employed is zero")]
    ZeroCapitalEmployed,

    #[error("data source panicked: {0}")]
    Panicked(String),

    #[error("not enough price history: have {bars} closes, need {minimum}")]
    InsufficientPrices { bars: usize, minimum: usize },
}

/// Top-level error type for roce-screener.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("failed to read results from {path}: {reason}")]
    ResultsRead { path: String, reason: String },

    #[error("failed to write results to {path}: {reason}")]
    ResultsWrite { path: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) | ScreenerError::Csv(_) => 1,
            ScreenerError::ConfigParse { .. } | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::DataSource { .. } => 3,
            ScreenerError::ResultsRead { .. } | ScreenerError::ResultsWrite { .. } => 4,
            ScreenerError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
