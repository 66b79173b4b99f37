//! Market data access port trait.

use crate::domain::error::ScreenerError;
use crate::domain::price::PriceBar;
use crate::domain::statement::StatementTable;
use chrono::NaiveDate;

/// Annual statements and display name for one company.
#[derive(Debug, Clone, Default)]
pub struct CompanyFinancials {
    pub name: String,
    pub income_statement: StatementTable,
    pub balance_sheet: StatementTable,
}

pub trait FundamentalsPort {
    fn fetch_financials(&self, symbol: &str) -> Result<CompanyFinancials, ScreenerError>;

    /// Daily closes from `start` onward, oldest first.
    fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScreenerError>;
}
