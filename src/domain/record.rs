//! Per-ticker screening output.

use serde::{Deserialize, Serialize};

/// One analyzed company. Field names double as the results CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerRecord {
    pub ticker: String,
    pub name: String,
    pub year_latest: i32,
    pub year_prev: i32,
    pub revenue_latest: f64,
    pub revenue_prev: f64,
    pub revenue_yoy_pct: Option<f64>,
    pub op_income_latest: f64,
    pub op_income_prev: f64,
    pub op_income_yoy_pct: Option<f64>,
    pub total_assets_latest: f64,
    pub current_liabilities_latest: f64,
    pub capital_employed: f64,
    pub roce_pct: f64,
    pub pass_roce: bool,
    pub pass_revenue_yoy: bool,
    pub pass_op_yoy: bool,
    pub pass_all: bool,
}

pub const CSV_HEADER: [&str; 18] = [
    "ticker",
    "name",
    "year_latest",
    "year_prev",
    "revenue_latest",
    "revenue_prev",
    "revenue_yoy_pct",
    "op_income_latest",
    "op_income_prev",
    "op_income_yoy_pct",
    "total_assets_latest",
    "current_liabilities_latest",
    "capital_employed",
    "roce_pct",
    "pass_roce",
    "pass_revenue_yoy",
    "pass_op_yoy",
    "pass_all",
];
