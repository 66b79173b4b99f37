//! roce-screener: fundamentals screening by return on capital employed and
//! year-over-year growth, plus a moving-average crossover scan.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
