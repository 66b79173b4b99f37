//! Batch screening over a ticker universe.
//!
//! Tickers are processed one at a time in input order with a fixed pause
//! between fetches. A failure for one ticker, including a panic inside the
//! data source, is logged and recorded as a skip; it never aborts the run.

use crate::domain::crossover::{analyze_prices, CrossRecord, CrossoverConfig};
use crate::domain::error::SkipReason;
use crate::domain::fiscal_year::align;
use crate::domain::metrics::{compute, ResolvedRows};
use crate::domain::price::normalize;
use crate::domain::record::TickerRecord;
use crate::domain::resolver::LabelCandidates;
use crate::domain::result_set::ResultSet;
use crate::domain::thresholds::Thresholds;
use crate::ports::data_port::{CompanyFinancials, FundamentalsPort};
use chrono::NaiveDate;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct ScreenSettings {
    pub thresholds: Thresholds,
    pub labels: LabelCandidates,
    pub pause: Duration,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            labels: LabelCandidates::default(),
            pause: DEFAULT_PAUSE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ScreenOutcome {
    pub results: ResultSet,
    pub skipped: Vec<SkippedTicker>,
}

/// Builds a record from already-fetched statements.
pub fn analyze_financials(
    ticker: &str,
    financials: &CompanyFinancials,
    settings: &ScreenSettings,
) -> Result<TickerRecord, SkipReason> {
    if financials.income_statement.is_empty() || financials.balance_sheet.is_empty() {
        return Err(SkipReason::MissingStatements);
    }
    let years = align(&financials.income_statement)?;
    let rows = ResolvedRows::resolve(
        &financials.income_statement,
        &financials.balance_sheet,
        &settings.labels,
    )?;
    compute(ticker, &financials.name, &rows, years, &settings.thresholds)
}

pub fn analyze_ticker(
    port: &dyn FundamentalsPort,
    ticker: &str,
    settings: &ScreenSettings,
) -> Result<TickerRecord, SkipReason> {
    let financials = port
        .fetch_financials(ticker)
        .map_err(|e| SkipReason::FetchFailed(e.to_string()))?;
    analyze_financials(ticker, &financials, settings)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Calls `step` for each ticker in order, sleeping `pause` between calls.
fn for_each_politely<T>(
    tickers: &[String],
    pause: Duration,
    mut step: impl FnMut(&str) -> Result<T, SkipReason>,
) -> (Vec<T>, Vec<SkippedTicker>) {
    let mut collected = Vec::new();
    let mut skipped = Vec::new();
    let total = tickers.len();

    for (i, ticker) in tickers.iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            thread::sleep(pause);
        }
        tracing::info!(ticker = %ticker, "[{}/{}] processing", i + 1, total);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| step(ticker)))
            .unwrap_or_else(|payload| Err(SkipReason::Panicked(panic_message(payload.as_ref()))));
        match outcome {
            Ok(item) => collected.push(item),
            Err(reason) => {
                tracing::warn!(ticker = %ticker, %reason, "skipping");
                skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason,
                });
            }
        }
    }

    (collected, skipped)
}

/// Screens every ticker and returns the sorted records plus the skips.
/// Errors and panics raised by `port` for one ticker only skip that ticker.
pub fn run(
    tickers: &[String],
    port: &dyn FundamentalsPort,
    settings: &ScreenSettings,
) -> ScreenOutcome {
    tracing::info!(count = tickers.len(), "starting fundamentals screen");
    let (records, skipped) = for_each_politely(tickers, settings.pause, |ticker| {
        analyze_ticker(port, ticker, settings)
    });

    let results = ResultSet::new(records);
    tracing::info!(
        records = results.len(),
        passing = results.passing_count(),
        skipped = skipped.len(),
        "screen finished"
    );
    ScreenOutcome { results, skipped }
}

#[derive(Debug, Clone)]
pub struct CrossOutcome {
    pub records: Vec<CrossRecord>,
    pub skipped: Vec<SkippedTicker>,
}

pub fn run_crossover(
    tickers: &[String],
    port: &dyn FundamentalsPort,
    config: &CrossoverConfig,
    start: NaiveDate,
    pause: Duration,
) -> CrossOutcome {
    tracing::info!(
        count = tickers.len(),
        short = config.short_window,
        long = config.long_window,
        "starting crossover screen"
    );
    let (records, skipped) = for_each_politely(tickers, pause, |ticker| {
        let bars = port
            .fetch_daily_closes(ticker, start)
            .map_err(|e| SkipReason::FetchFailed(e.to_string()))?;
        analyze_prices(ticker, &normalize(bars), config)
    });
    CrossOutcome { records, skipped }
}
