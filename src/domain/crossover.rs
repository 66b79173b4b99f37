//! Moving-average crossover detection.
//!
//! A golden cross at bar `i` means the short SMA was strictly below the long
//! SMA at `i-1` and strictly above it at `i`; a death cross is the mirror
//! image. Bars where either average is still warming up never cross.

use crate::domain::error::SkipReason;
use crate::domain::indicator::{calculate_sma, IndicatorSeries};
use crate::domain::price::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverConfig {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossKind {
    Golden,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cross {
    pub date: NaiveDate,
    pub kind: CrossKind,
}

fn cross_at(short: &IndicatorSeries, long: &IndicatorSeries, i: usize) -> Option<CrossKind> {
    if i == 0 {
        return None;
    }
    let (s_prev, l_prev) = (short.get(i - 1)?, long.get(i - 1)?);
    let (s_curr, l_curr) = (short.get(i)?, long.get(i)?);
    if s_prev < l_prev && s_curr > l_curr {
        Some(CrossKind::Golden)
    } else if s_prev > l_prev && s_curr < l_curr {
        Some(CrossKind::Death)
    } else {
        None
    }
}

/// Every crossover in chronological order. `bars` must be sorted by date.
pub fn find_crosses(bars: &[PriceBar], config: &CrossoverConfig) -> Vec<Cross> {
    let short = calculate_sma(bars, config.short_window);
    let long = calculate_sma(bars, config.long_window);
    (1..bars.len())
        .filter_map(|i| {
            cross_at(&short, &long, i).map(|kind| Cross {
                date: bars[i].date,
                kind,
            })
        })
        .collect()
}

/// One row of crossover screener output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRecord {
    pub ticker: String,
    pub latest_golden_cross: Option<NaiveDate>,
    pub latest_death_cross: Option<NaiveDate>,
    pub last_close: f64,
    pub sma_short: f64,
    pub sma_long: f64,
}

impl CrossRecord {
    /// True when the most recent crossover is a golden cross.
    pub fn in_uptrend(&self) -> bool {
        match (self.latest_golden_cross, self.latest_death_cross) {
            (Some(golden), Some(death)) => golden > death,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

pub fn analyze_prices(
    ticker: &str,
    bars: &[PriceBar],
    config: &CrossoverConfig,
) -> Result<CrossRecord, SkipReason> {
    if bars.len() < config.long_window {
        return Err(SkipReason::InsufficientPrices {
            bars: bars.len(),
            minimum: config.long_window,
        });
    }

    let crosses = find_crosses(bars, config);
    let latest = |kind: CrossKind| {
        crosses
            .iter()
            .rev()
            .find(|c| c.kind == kind)
            .map(|c| c.date)
    };

    let short = calculate_sma(bars, config.short_window);
    let long = calculate_sma(bars, config.long_window);
    let last_close = bars.last().map(|b| b.close).unwrap_or_default();

    Ok(CrossRecord {
        ticker: ticker.to_string(),
        latest_golden_cross: latest(CrossKind::Golden),
        latest_death_cross: latest(CrossKind::Death),
        last_close,
        sma_short: short.last_valid().unwrap_or_default(),
        sma_long: long.last_valid().unwrap_or_default(),
    })
}
