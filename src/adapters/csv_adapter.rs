//! Directory-backed fundamentals source.
//!
//! Layout under `base_path`:
//! - `{SYMBOL}_income.csv` and `{SYMBOL}_balance.csv`: first column is the
//!   line-item label, remaining header cells are column labels.
//! - `{SYMBOL}_prices.csv`: `date,close`.
//! - `names.csv` (optional): `ticker,name`.

use crate::domain::error::ScreenerError;
use crate::domain::price::PriceBar;
use crate::domain::statement::{ColumnLabel, StatementTable};
use crate::ports::data_port::{CompanyFinancials, FundamentalsPort};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn symbol_path(&self, symbol: &str, kind: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, kind))
    }

    fn read(path: &Path) -> Result<String, ScreenerError> {
        let content = fs::read_to_string(path).map_err(|e| ScreenerError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Ok(content.trim_start_matches('\u{feff}').to_string())
    }

    fn display_name(&self, symbol: &str) -> Result<Option<String>, ScreenerError> {
        let path = self.base_path.join("names.csv");
        if !path.exists() {
            return Ok(None);
        }
        let content = Self::read(&path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        for result in rdr.records() {
            let record = result?;
            let ticker = record.get(0).map(str::trim).unwrap_or_default();
            if ticker.eq_ignore_ascii_case(symbol) {
                let name = record.get(1).map(str::trim).unwrap_or_default();
                return Ok((!name.is_empty()).then(|| name.to_string()));
            }
        }
        Ok(None)
    }
}

/// Parses a label-by-column statement. Blank or non-numeric cells are missing.
pub fn parse_statement(content: &str) -> Result<StatementTable, ScreenerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<ColumnLabel> = rdr
        .headers()?
        .iter()
        .skip(1)
        .map(|h| ColumnLabel::parse(h.trim()))
        .collect();
    let mut table = StatementTable::new(columns);

    for result in rdr.records() {
        let record = result?;
        let Some(label) = record.get(0).map(str::trim) else {
            continue;
        };
        if label.is_empty() {
            continue;
        }
        let values = record
            .iter()
            .skip(1)
            .map(|cell| cell.trim().replace(',', "").parse::<f64>().ok())
            .collect();
        table.insert_row(label, values);
    }

    Ok(table)
}

impl FundamentalsPort for CsvAdapter {
    fn fetch_financials(&self, symbol: &str) -> Result<CompanyFinancials, ScreenerError> {
        let income = parse_statement(&Self::read(&self.symbol_path(symbol, "income"))?)?;
        let balance = parse_statement(&Self::read(&self.symbol_path(symbol, "balance"))?)?;
        let name = self
            .display_name(symbol)?
            .unwrap_or_else(|| symbol.to_string());

        Ok(CompanyFinancials {
            name,
            income_statement: income,
            balance_sheet: balance,
        })
    }

    fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScreenerError> {
        let content = Self::read(&self.symbol_path(symbol, "prices"))?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result?;

            let date_str = record.get(0).ok_or_else(|| ScreenerError::DataSource {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                ScreenerError::DataSource {
                    reason: format!("invalid date format: {}", e),
                }
            })?;
            if date < start {
                continue;
            }

            let close: f64 = record
                .get(1)
                .ok_or_else(|| ScreenerError::DataSource {
                    reason: "missing close column".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| ScreenerError::DataSource {
                    reason: format!("invalid close value: {}", e),
                })?;

            bars.push(PriceBar::new(date, close));
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::write(
            path.join("ACME_income.csv"),
            "\u{feff}item,2023-12-31,2022-12-31\n\
             Total Revenue,120,100\n\
             Operating Income,30,\n\
             Notes,n/a,1\n",
        )
        .unwrap();
        fs::write(
            path.join("ACME_balance.csv"),
            "item,2023-12-31,2022-12-31\n\
             Total Assets,500,450\n\
             Current Liabilities,100,90\n",
        )
        .unwrap();
        fs::write(
            path.join("ACME_prices.csv"),
            "date,close\n\
             2025-01-03,11.5\n\
             2024-12-31,10.0\n\
             2025-01-02,11.0\n",
        )
        .unwrap();
        fs::write(path.join("names.csv"), "ticker,name\nACME,Acme Corp\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_financials_reads_both_statements() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let fin = adapter.fetch_financials("ACME").unwrap();
        assert_eq!(fin.name, "Acme Corp");
        assert_eq!(fin.income_statement.year_labels(), vec!["2023", "2022"]);

        let revenue = fin.income_statement.row("Total Revenue").unwrap();
        assert_eq!(revenue.values, vec![Some(120.0), Some(100.0)]);
        let op = fin.income_statement.row("Operating Income").unwrap();
        assert_eq!(op.values, vec![Some(30.0), None]);
        let notes = fin.income_statement.row("Notes").unwrap();
        assert_eq!(notes.values, vec![None, Some(1.0)]);

        assert!(fin.balance_sheet.row("Total Assets").is_some());
    }

    #[test]
    fn name_falls_back_to_symbol() {
        let (_dir, path) = setup_test_data();
        fs::remove_file(path.join("names.csv")).unwrap();
        let adapter = CsvAdapter::new(path);

        let fin = adapter.fetch_financials("ACME").unwrap();
        assert_eq!(fin.name, "ACME");
    }

    #[test]
    fn missing_statement_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_financials("XYZ");
        assert!(matches!(result, Err(ScreenerError::DataSource { .. })));
    }

    #[test]
    fn fetch_daily_closes_filters_and_sorts() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let bars = adapter.fetch_daily_closes("ACME", start).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(bars[0].close, 11.0);
        assert_eq!(bars[1].close, 11.5);
    }

    #[test]
    fn bad_close_value_is_error() {
        let (_dir, path) = setup_test_data();
        fs::write(path.join("BAD_prices.csv"), "date,close\n2025-01-02,abc\n").unwrap();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(adapter.fetch_daily_closes("BAD", start).is_err());
    }

    #[test]
    fn raw_column_labels_are_kept() {
        let table = parse_statement("item,FY2023,2022\nTotal Revenue,1,2\n").unwrap();
        assert_eq!(
            table.columns,
            vec![
                ColumnLabel::Raw("FY2023".into()),
                ColumnLabel::Raw("2022".into())
            ]
        );
    }
}
