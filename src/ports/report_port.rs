//! Report generation port trait.

use crate::domain::error::ScreenerError;
use crate::domain::record::TickerRecord;
use crate::domain::result_set::FilterView;

/// What a report shows: the filtered view plus the size of the stored set.
pub struct ReportContext<'a> {
    pub view: &'a FilterView,
    pub filtered: &'a [&'a TickerRecord],
    pub total: usize,
}

/// Port for writing screening reports.
pub trait ReportPort {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &str) -> Result<(), ScreenerError>;
}
