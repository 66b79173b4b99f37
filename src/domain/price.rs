//! Daily closing prices.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Sorts by date and drops non-finite closes and repeated dates (first wins).
pub fn normalize(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.retain(|b| b.close.is_finite());
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    bars
}
