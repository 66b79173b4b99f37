//! Core domain types and logic.

pub mod statement;
pub mod resolver;
pub mod fiscal_year;
pub mod metrics;
pub mod record;
pub mod thresholds;
pub mod result_set;
pub mod screener;
pub mod tickers;
pub mod price;
pub mod indicator;
pub mod crossover;
pub mod config_validation;
pub mod error;
