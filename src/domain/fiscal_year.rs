//! Fiscal-year alignment for statement columns.
//!
//! Only columns whose normalized label is a plain digit string count as
//! fiscal years. There is no positional fallback: either two validated years
//! are found or the table is rejected.

use crate::domain::error::SkipReason;
use crate::domain::statement::StatementTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalYears {
    pub latest: i32,
    pub previous: i32,
}

fn parse_year(label: &str) -> Option<i32> {
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    label.parse().ok()
}

pub fn align(table: &StatementTable) -> Result<FiscalYears, SkipReason> {
    let mut years: Vec<i32> = table
        .year_labels()
        .iter()
        .filter_map(|label| parse_year(label))
        .collect();
    years.sort_unstable();
    years.dedup();

    match years.as_slice() {
        [.., previous, latest] => Ok(FiscalYears {
            latest: *latest,
            previous: *previous,
        }),
        _ => Err(SkipReason::InsufficientYears),
    }
}
