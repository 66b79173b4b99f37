//! ROCE and year-over-year growth for a single company.
//!
//! A missing input or zero capital employed rejects the whole record. A
//! growth figure that cannot be computed only degrades that one metric.

use crate::domain::error::SkipReason;
use crate::domain::fiscal_year::FiscalYears;
use crate::domain::record::TickerRecord;
use crate::domain::resolver::{resolve, LabelCandidates};
use crate::domain::statement::{StatementRow, StatementTable};
use crate::domain::thresholds::Thresholds;

/// (latest - previous) / |previous| * 100, or `None` when the previous value
/// is zero or the result is not finite.
pub fn yoy_growth(latest: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let pct = (latest - previous) / previous.abs() * 100.0;
    pct.is_finite().then_some(pct)
}

/// operating income / (total assets - current liabilities) * 100.
pub fn roce(operating_income: f64, total_assets: f64, current_liabilities: f64) -> Option<f64> {
    let capital_employed = total_assets - current_liabilities;
    if capital_employed == 0.0 {
        return None;
    }
    Some(operating_income / capital_employed * 100.0)
}

/// A statement row together with the table whose columns index it.
#[derive(Debug, Clone, Copy)]
pub struct LineItem<'a> {
    pub table: &'a StatementTable,
    pub row: &'a StatementRow,
}

impl<'a> LineItem<'a> {
    fn value(&self, item: &'static str, year: i32) -> Result<f64, SkipReason> {
        self.table
            .value_at(self.row, &year.to_string())
            .ok_or(SkipReason::MissingValue { item, year })
    }
}

/// The four resolved line items a record is built from.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRows<'a> {
    pub revenue: LineItem<'a>,
    pub operating_income: LineItem<'a>,
    pub total_assets: LineItem<'a>,
    pub current_liabilities: LineItem<'a>,
}

impl<'a> ResolvedRows<'a> {
    /// Resolves revenue and operating income from the income statement and
    /// the two balance-sheet items from the balance sheet.
    pub fn resolve(
        income: &'a StatementTable,
        balance: &'a StatementTable,
        labels: &LabelCandidates,
    ) -> Result<Self, SkipReason> {
        let find = |table: &'a StatementTable, candidates: &[String], item: &'static str| {
            resolve(table, candidates)
                .map(|row| LineItem { table, row })
                .ok_or(SkipReason::RowNotFound(item))
        };
        Ok(Self {
            revenue: find(income, &labels.revenue, "revenue")?,
            operating_income: find(income, &labels.operating_income, "operating income")?,
            total_assets: find(balance, &labels.total_assets, "total assets")?,
            current_liabilities: find(
                balance,
                &labels.current_liabilities,
                "current liabilities",
            )?,
        })
    }
}

pub fn compute(
    ticker: &str,
    name: &str,
    rows: &ResolvedRows<'_>,
    years: FiscalYears,
    thresholds: &Thresholds,
) -> Result<TickerRecord, SkipReason> {
    let revenue_latest = rows.revenue.value("revenue", years.latest)?;
    let revenue_prev = rows.revenue.value("revenue", years.previous)?;
    let op_income_latest = rows.operating_income.value("operating income", years.latest)?;
    let op_income_prev = rows
        .operating_income
        .value("operating income", years.previous)?;
    let total_assets_latest = rows.total_assets.value("total assets", years.latest)?;
    let current_liabilities_latest = rows
        .current_liabilities
        .value("current liabilities", years.latest)?;

    let revenue_yoy_pct = yoy_growth(revenue_latest, revenue_prev);
    let op_income_yoy_pct = yoy_growth(op_income_latest, op_income_prev);

    let capital_employed = total_assets_latest - current_liabilities_latest;
    let roce_pct = roce(op_income_latest, total_assets_latest, current_liabilities_latest)
        .ok_or(SkipReason::ZeroCapitalEmployed)?;

    let pass_roce = thresholds.passes_roce(roce_pct);
    let pass_revenue_yoy = thresholds.passes_revenue_yoy(revenue_yoy_pct);
    let pass_op_yoy = thresholds.passes_op_income_yoy(op_income_yoy_pct);

    Ok(TickerRecord {
        ticker: ticker.to_string(),
        name: name.to_string(),
        year_latest: years.latest,
        year_prev: years.previous,
        revenue_latest,
        revenue_prev,
        revenue_yoy_pct,
        op_income_latest,
        op_income_prev,
        op_income_yoy_pct,
        total_assets_latest,
        current_liabilities_latest,
        capital_employed,
        roce_pct,
        pass_roce,
        pass_revenue_yoy,
        pass_op_yoy,
        pass_all: pass_roce && pass_revenue_yoy && pass_op_yoy,
    })
}
