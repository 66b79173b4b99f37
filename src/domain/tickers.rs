//! Ticker universe loading.
//!
//! Reads a plain list of symbols, one per line, and falls back to a
//! configured or built-in list when the file does not exist.

use crate::domain::error::ScreenerError;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Large US companies used when no ticker file is available.
pub const DEFAULT_TICKERS: [&str; 20] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "UNH", "JNJ", "XOM", "PG", "HD",
    "PFE", "KO", "V", "MA", "PEP", "DIS", "INTC", "NFLX",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerSource {
    File,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct TickerList {
    pub tickers: Vec<String>,
    pub source: TickerSource,
}

impl TickerList {
    pub fn count(&self) -> usize {
        self.tickers.len()
    }
}

/// Parses newline-separated symbols. Blank lines and `#` comments are
/// skipped; symbols are upper-cased and duplicates dropped.
pub fn parse_tickers(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();
    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default().trim();
        // tolerate a BOM on the first line
        let symbol = line.trim_start_matches('\u{feff}').trim().to_uppercase();
        if symbol.is_empty() {
            continue;
        }
        if seen.insert(symbol.clone()) {
            tickers.push(symbol);
        } else {
            tracing::debug!(ticker = %symbol, "duplicate ticker ignored");
        }
    }
    tickers
}

/// Parses a comma-separated symbol list, as used in config files.
pub fn parse_ticker_csv(input: &str) -> Vec<String> {
    parse_tickers(&input.replace(',', "\n"))
}

pub fn load_tickers(
    path: &Path,
    fallback: &[String],
    limit: Option<usize>,
) -> Result<TickerList, ScreenerError> {
    let mut list = match fs::read_to_string(path) {
        Ok(content) => {
            let tickers = parse_tickers(&content);
            tracing::info!(
                count = tickers.len(),
                path = %path.display(),
                "loaded tickers from file"
            );
            TickerList {
                tickers,
                source: TickerSource::File,
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let tickers = if fallback.is_empty() {
                DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect()
            } else {
                fallback.to_vec()
            };
            tracing::warn!(
                path = %path.display(),
                count = tickers.len(),
                "ticker file not found, using fallback list"
            );
            TickerList {
                tickers,
                source: TickerSource::Fallback,
            }
        }
        Err(e) => return Err(ScreenerError::Io(e)),
    };

    if let Some(limit) = limit {
        list.tickers.truncate(limit);
    }
    Ok(list)
}
