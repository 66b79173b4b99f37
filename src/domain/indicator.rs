//! Simple moving average over daily closes.
//!
//! Warmup: the first (n-1) points are invalid.

use crate::domain::price::PriceBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub period: usize,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// The value at `index`, if that point is past warmup.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }

    pub fn last_valid(&self) -> Option<f64> {
        self.values.iter().rev().find(|p| p.valid).map(|p| p.value)
    }
}

pub fn calculate_sma(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            period,
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= period {
            sum -= bars[i - period].close;
        }
        let valid = i + 1 >= period;
        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: if valid { sum / period as f64 } else { 0.0 },
        });
    }

    IndicatorSeries { period, values }
}
