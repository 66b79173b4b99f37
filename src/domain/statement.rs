//! Financial statement tables keyed by line-item label and fiscal period.

use chrono::{Datelike, NaiveDate};

/// A statement column header. Providers label periods either with a
/// period-end date or with a bare string such as `"2023"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLabel {
    Date(NaiveDate),
    Raw(String),
}

impl ColumnLabel {
    /// Parses a header cell, treating `YYYY-MM-DD` as a date.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => ColumnLabel::Date(date),
            Err(_) => ColumnLabel::Raw(trimmed.to_string()),
        }
    }

    /// The year string this column represents: the year component for dates,
    /// the trimmed text otherwise.
    pub fn year_label(&self) -> String {
        match self {
            ColumnLabel::Date(date) => date.year().to_string(),
            ColumnLabel::Raw(text) => text.trim().to_string(),
        }
    }
}

/// One line item; `values[i]` belongs to `StatementTable::columns[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementTable {
    pub columns: Vec<ColumnLabel>,
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    pub fn new(columns: Vec<ColumnLabel>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// Appends a row, or fills in the given row if the label already exists.
    /// NaN and infinite values are stored as missing. Values past the last
    /// column are dropped; short rows are padded with missing values.
    pub fn insert_row(&mut self, label: &str, values: Vec<Option<f64>>) {
        let mut cleaned: Vec<Option<f64>> = values
            .into_iter()
            .take(self.columns.len())
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        cleaned.resize(self.columns.len(), None);

        match self.rows.iter_mut().find(|r| r.label == label) {
            Some(existing) => {
                for (slot, value) in existing.values.iter_mut().zip(cleaned) {
                    if slot.is_none() {
                        *slot = value;
                    }
                }
            }
            None => self.rows.push(StatementRow {
                label: label.to_string(),
                values: cleaned,
            }),
        }
    }

    /// Sets a single cell, adding the row if needed.
    pub fn set(&mut self, label: &str, column: usize, value: f64) {
        if column >= self.columns.len() {
            return;
        }
        let mut values = vec![None; self.columns.len()];
        values[column] = Some(value);
        self.insert_row(label, values);
    }

    pub fn row(&self, label: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Normalized year label of every column, in column order.
    pub fn year_labels(&self) -> Vec<String> {
        self.columns.iter().map(ColumnLabel::year_label).collect()
    }

    /// Value of `row` in the first column whose year label equals `year`.
    pub fn value_at(&self, row: &StatementRow, year: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c.year_label() == year)
            .and_then(|idx| row.values.get(idx).copied().flatten())
    }
}
