//! Ranked line-item lookup.
//!
//! Providers spell the same concept differently ("Total Revenue", "Revenues",
//! "totalRevenue"), so each concept is looked up through an ordered list of
//! candidate labels: exact matches first, then a case-insensitive
//! equals/contains/contained-by match. Candidate order always wins over table
//! order.

use crate::domain::statement::{StatementRow, StatementTable};

pub fn resolve<'a, S: AsRef<str>>(
    table: &'a StatementTable,
    candidates: &[S],
) -> Option<&'a StatementRow> {
    for candidate in candidates {
        if let Some(row) = table.row(candidate.as_ref()) {
            return Some(row);
        }
    }

    let lowered: Vec<String> = table.rows.iter().map(|r| r.label.to_lowercase()).collect();
    for candidate in candidates {
        let c = candidate.as_ref().to_lowercase();
        if c.is_empty() {
            continue;
        }
        for (i, label) in lowered.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            if *label == c || label.contains(&c) || c.contains(label.as_str()) {
                return Some(&table.rows[i]);
            }
        }
    }

    None
}

/// Candidate spellings for each concept the screener needs.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidates {
    pub revenue: Vec<String>,
    pub operating_income: Vec<String>,
    pub total_assets: Vec<String>,
    pub current_liabilities: Vec<String>,
}

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

impl Default for LabelCandidates {
    fn default() -> Self {
        Self {
            revenue: owned(&[
                "Total Revenue",
                "Revenue",
                "Revenues",
                "Total revenues",
                "TotalRevenue",
            ]),
            operating_income: owned(&[
                "Operating Income",
                "Operating income",
                "Income From Continuing Operations",
                "OperatingIncome",
                "OperatingProfit",
            ]),
            total_assets: owned(&["Total Assets", "Assets", "totalAssets", "Total assets"]),
            current_liabilities: owned(&[
                "Total Current Liabilities",
                "Current Liabilities",
                "Total current liabilities",
                "Current Liabilities & Short Term Debt",
                "currentLiabilities",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::statement::ColumnLabel;

    fn table(labels: &[&str]) -> StatementTable {
        let mut t = StatementTable::new(vec![ColumnLabel::Raw("2023".into())]);
        for (i, label) in labels.iter().enumerate() {
            t.insert_row(label, vec![Some(i as f64)]);
        }
        t
    }

    #[test]
    fn exact_match_first_candidate() {
        let t = table(&["Revenue", "Total Revenue"]);
        let row = resolve(&t, &["Total Revenue", "Revenue"]).unwrap();
        assert_eq!(row.label, "Total Revenue");
    }

    #[test]
    fn exact_match_beats_earlier_substring_candidate() {
        // "total revenue" would substring-match row 0, but the exact pass
        // runs over every candidate first.
        let t = table(&["Total Revenue Net", "Revenues"]);
        let row = resolve(&t, &["Total Revenue", "Revenues"]).unwrap();
        assert_eq!(row.label, "Revenues");
    }

    #[test]
    fn case_insensitive_equal() {
        let t = table(&["TOTAL ASSETS"]);
        let row = resolve(&t, &["Total Assets"]).unwrap();
        assert_eq!(row.label, "TOTAL ASSETS");
    }

    #[test]
    fn label_contains_candidate() {
        let t = table(&["totalCurrentLiabilities"]);
        let row = resolve(&t, &["Total Current Liabilities", "currentLiabilities"]).unwrap();
        assert_eq!(row.label, "totalCurrentLiabilities");
    }

    #[test]
    fn candidate_contains_label() {
        let t = table(&["revenue"]);
        let row = resolve(&t, &["Total Revenue"]).unwrap();
        assert_eq!(row.label, "revenue");
    }

    #[test]
    fn substring_match_follows_candidate_order_not_table_order() {
        let t = table(&["Gross Operating Profit", "Net Revenue Total"]);
        let row = resolve(&t, &["revenue", "operating profit"]).unwrap();
        assert_eq!(row.label, "Net Revenue Total");
    }

    #[test]
    fn not_found() {
        let t = table(&["Net Income", "EBITDA"]);
        assert!(resolve(&t, &["Total Revenue", "Revenue"]).is_none());
    }

    #[test]
    fn empty_candidate_never_matches() {
        let t = table(&["Net Income"]);
        assert!(resolve(&t, &[""]).is_none());
    }

    #[test]
    fn resolves_fmp_field_names_with_defaults() {
        let labels = LabelCandidates::default();
        let t = table(&[
            "grossProfit",
            "revenue",
            "operatingIncome",
            "totalAssets",
            "totalCurrentLiabilities",
        ]);
        assert_eq!(resolve(&t, &labels.revenue).unwrap().label, "revenue");
        assert_eq!(
            resolve(&t, &labels.operating_income).unwrap().label,
            "operatingIncome"
        );
        assert_eq!(resolve(&t, &labels.total_assets).unwrap().label, "totalAssets");
        assert_eq!(
            resolve(&t, &labels.current_liabilities).unwrap().label,
            "totalCurrentLiabilities"
        );
    }

    #[test]
    fn returns_row_data_unchanged() {
        let mut t = StatementTable::new(vec![
            ColumnLabel::Raw("2023".into()),
            ColumnLabel::Raw("2022".into()),
        ]);
        t.insert_row("Operating Income", vec![Some(60.0), Some(50.0)]);
        t.insert_row("Other", vec![Some(1.0), Some(2.0)]);
        let row = resolve(&t, &["Operating Income"]).unwrap();
        assert_eq!(row.values, vec![Some(60.0), Some(50.0)]);
    }
}
