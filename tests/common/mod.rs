#![allow(dead_code)]

use chrono::NaiveDate;
use roce_screener::domain::error::ScreenerError;
pub use roce_screener::domain::price::PriceBar;
use roce_screener::domain::statement::{ColumnLabel, StatementTable};
use roce_screener::ports::data_port::{CompanyFinancials, FundamentalsPort};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockFundamentalsPort {
    pub companies: HashMap<String, CompanyFinancials>,
    pub prices: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockFundamentalsPort {
    pub fn new() -> Self {
        Self {
            companies: HashMap::new(),
            prices: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_company(mut self, symbol: &str, financials: CompanyFinancials) -> Self {
        self.companies.insert(symbol.to_string(), financials);
        self
    }

    pub fn with_prices(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.prices.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check(&self, symbol: &str) -> Result<(), ScreenerError> {
        self.calls.borrow_mut().push(symbol.to_string());
        match self.errors.get(symbol) {
            Some(reason) => Err(ScreenerError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl FundamentalsPort for MockFundamentalsPort {
    fn fetch_financials(&self, symbol: &str) -> Result<CompanyFinancials, ScreenerError> {
        self.check(symbol)?;
        Ok(self.companies.get(symbol).cloned().unwrap_or_default())
    }

    fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScreenerError> {
        self.check(symbol)?;
        Ok(self
            .prices
            .get(symbol)
            .map(|bars| bars.iter().filter(|b| b.date >= start).cloned().collect())
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A statement with one column per year label, most recent first.
pub fn statement(years: &[&str], rows: &[(&str, &[Option<f64>])]) -> StatementTable {
    let mut table = StatementTable::new(years.iter().map(|y| ColumnLabel::parse(y)).collect());
    for (label, values) in rows {
        table.insert_row(label, values.to_vec());
    }
    table
}

/// Two-year company with the given figures; `[latest, previous]` per item.
pub fn make_company(
    name: &str,
    revenue: [f64; 2],
    op_income: [f64; 2],
    total_assets: f64,
    current_liabilities: f64,
) -> CompanyFinancials {
    let years = ["2023", "2022"];
    CompanyFinancials {
        name: name.to_string(),
        income_statement: statement(
            &years,
            &[
                ("Total Revenue", &[Some(revenue[0]), Some(revenue[1])]),
                ("Operating Income", &[Some(op_income[0]), Some(op_income[1])]),
            ],
        ),
        balance_sheet: statement(
            &years,
            &[
                ("Total Assets", &[Some(total_assets), None]),
                ("Current Liabilities", &[Some(current_liabilities), None]),
            ],
        ),
    }
}

/// Daily bars starting at `start`, one per calendar day.
pub fn make_bars(start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(start + chrono::Days::new(i as u64), close))
        .collect()
}
