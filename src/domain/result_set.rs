//! Sorted screening results and the read-only projections over them.

use crate::domain::record::TickerRecord;
use crate::domain::thresholds::Thresholds;
use std::cmp::Ordering;

/// Records ordered by (`pass_all` desc, ROCE desc).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<TickerRecord>,
}

fn by_roce_desc(a: &TickerRecord, b: &TickerRecord) -> Ordering {
    b.roce_pct.total_cmp(&a.roce_pct)
}

impl ResultSet {
    pub fn new(mut records: Vec<TickerRecord>) -> Self {
        records.sort_by(|a, b| b.pass_all.cmp(&a.pass_all).then_with(|| by_roce_desc(a, b)));
        Self { records }
    }

    pub fn records(&self) -> &[TickerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn passing_count(&self) -> usize {
        self.records.iter().filter(|r| r.pass_all).count()
    }

    /// Records that fail at least one threshold: the exact negation of
    /// [`meets`].
    pub fn rejected(&self, thresholds: &Thresholds) -> Vec<&TickerRecord> {
        self.records
            .iter()
            .filter(|r| !meets(r, thresholds))
            .collect()
    }
}

/// Whether a stored record clears every threshold, re-evaluated from its
/// metrics rather than its stored flags.
pub fn meets(record: &TickerRecord, thresholds: &Thresholds) -> bool {
    thresholds.passes_roce(record.roce_pct)
        && thresholds.passes_revenue_yoy(record.revenue_yoy_pct)
        && thresholds.passes_op_income_yoy(record.op_income_yoy_pct)
}

/// A viewer's filter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterView {
    pub thresholds: Thresholds,
    /// Additionally require the `pass_all` flag stored by the screening run.
    pub only_passing: bool,
}

impl FilterView {
    /// Records meeting the view's thresholds, sorted by ROCE descending.
    pub fn apply<'a>(&self, results: &'a ResultSet) -> Vec<&'a TickerRecord> {
        let mut filtered: Vec<&TickerRecord> = results
            .records()
            .iter()
            .filter(|r| meets(r, &self.thresholds))
            .filter(|r| !self.only_passing || r.pass_all)
            .collect();
        filtered.sort_by(|a, b| by_roce_desc(a, b));
        filtered
    }
}

/// The first `n` records by ROCE descending.
pub fn top_by_roce<'a>(records: &[&'a TickerRecord], n: usize) -> Vec<&'a TickerRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| by_roce_desc(a, b));
    sorted.truncate(n);
    sorted
}
