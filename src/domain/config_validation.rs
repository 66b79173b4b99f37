//! Configuration validation.
//!
//! Every key is optional; these checks only reject values that are present
//! but unusable.

use crate::domain::error::ScreenerError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const PROVIDERS: [&str; 2] = ["fmp", "csv"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_thresholds(config)?;
    validate_screener(config)?;
    validate_source(config)?;
    validate_crossover(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ScreenerError {
    ScreenerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Present values must parse; `get_double` would otherwise silently fall back.
fn parse_number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), ScreenerError> {
    if let Some(raw) = config.get_string(section, key) {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| invalid(section, key, format!("'{}' is not a number", raw.trim())))?;
        if !value.is_finite() {
            return Err(invalid(section, key, "must be finite"));
        }
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    for key in ["roce_min", "revenue_yoy_min", "op_income_yoy_min"] {
        parse_number(config, "thresholds", key)?;
    }
    Ok(())
}

fn validate_screener(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    parse_number(config, "screener", "max_tickers")?;
    if config.get_int("screener", "max_tickers", 0) < 0 {
        return Err(invalid("screener", "max_tickers", "must be non-negative"));
    }
    parse_number(config, "screener", "pause_ms")?;
    if config.get_int("screener", "pause_ms", 0) < 0 {
        return Err(invalid("screener", "pause_ms", "must be non-negative"));
    }
    if let Some(output) = config.get_string("screener", "output") {
        if output.trim().is_empty() {
            return Err(invalid("screener", "output", "must not be empty"));
        }
    }
    Ok(())
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let provider = config
        .get_string("source", "provider")
        .map(|p| p.trim().to_lowercase())
        .unwrap_or_else(|| "fmp".to_string());
    if !PROVIDERS.contains(&provider.as_str()) {
        return Err(invalid(
            "source",
            "provider",
            format!("unknown provider '{}', expected one of {:?}", provider, PROVIDERS),
        ));
    }
    if provider == "csv" {
        match config.get_string("source", "data_dir") {
            Some(dir) if !dir.trim().is_empty() => {}
            _ => return Err(invalid("source", "data_dir", "required for the csv provider")),
        }
    }
    Ok(())
}

fn validate_crossover(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    parse_number(config, "crossover", "short_window")?;
    parse_number(config, "crossover", "long_window")?;
    let short = config.get_int("crossover", "short_window", 20);
    let long = config.get_int("crossover", "long_window", 60);
    if short <= 0 {
        return Err(invalid("crossover", "short_window", "must be positive"));
    }
    if long <= 0 {
        return Err(invalid("crossover", "long_window", "must be positive"));
    }
    if short >= long {
        return Err(invalid(
            "crossover",
            "short_window",
            "short_window must be less than long_window",
        ));
    }
    if let Some(start) = config.get_string("crossover", "start_date") {
        NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "crossover",
                "start_date",
                "invalid start_date format, expected YYYY-MM-DD",
            )
        })?;
    }
    Ok(())
}
