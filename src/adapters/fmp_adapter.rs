//! Financial Modeling Prep HTTP data source.
//!
//! Statements come back as JSON arrays with one object per fiscal period.
//! Each object becomes one table column and each numeric field one row.

use crate::domain::error::ScreenerError;
use crate::domain::price::PriceBar;
use crate::domain::statement::{ColumnLabel, StatementTable};
use crate::ports::data_port::{CompanyFinancials, FundamentalsPort};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde_json::Value;
use std::env;
use std::time::Duration;

pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Display labels for the fields the screener looks up, so that the default
/// candidate lists hit on an exact match instead of a looser substring.
const FIELD_LABELS: [(&str, &str); 4] = [
    ("revenue", "Total Revenue"),
    ("operatingIncome", "Operating Income"),
    ("totalAssets", "Total Assets"),
    ("totalCurrentLiabilities", "Total Current Liabilities"),
];

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FMP API error: {0}")]
    Api(String),

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("no data available for {0}")]
    NoData(String),
}

impl From<FetchError> for ScreenerError {
    fn from(err: FetchError) -> Self {
        ScreenerError::DataSource {
            reason: err.to_string(),
        }
    }
}

pub struct FmpAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FmpAdapter {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
        })
    }

    /// Reads `FMP_API_KEY`, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, FetchError> {
        let _ = dotenvy::dotenv();
        let api_key = env::var("FMP_API_KEY").map_err(|_| FetchError::MissingApiKey)?;
        Self::new(api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, endpoint: &str) -> String {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!("{}/{}{}apikey={}", self.base_url, endpoint, sep, self.api_key)
    }

    fn get(&self, endpoint: &str) -> Result<Value, FetchError> {
        tracing::debug!(endpoint, "FMP request");
        let response = self.client.get(self.url(endpoint)).send()?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimitExceeded);
        }
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(FetchError::Api(format!("HTTP {status}: {text}")));
        }

        let value: Value = serde_json::from_str(&response.text()?)?;
        if let Some(message) = value.get("Error Message").and_then(Value::as_str) {
            return Err(FetchError::Api(message.to_string()));
        }
        Ok(value)
    }

    fn get_array(&self, endpoint: &str, symbol: &str) -> Result<Vec<Value>, FetchError> {
        match self.get(endpoint)? {
            Value::Array(items) if !items.is_empty() => Ok(items),
            _ => Err(FetchError::NoData(symbol.to_string())),
        }
    }

    fn statement(&self, kind: &str, symbol: &str) -> Result<StatementTable, FetchError> {
        let items = self.get_array(&format!("{kind}?symbol={symbol}&period=annual"), symbol)?;
        Ok(statement_from_json(&items))
    }
}

fn column_label(item: &Value, index: usize) -> ColumnLabel {
    let text = |key: &str| match item.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    match text("date").map(|d| ColumnLabel::parse(&d)) {
        Some(date @ ColumnLabel::Date(_)) => date,
        other => text("fiscalYear")
            .or_else(|| text("calendarYear"))
            .map(ColumnLabel::Raw)
            .or(other)
            .unwrap_or_else(|| ColumnLabel::Raw(index.to_string())),
    }
}

/// Builds a label-by-period table from statement objects.
pub fn statement_from_json(items: &[Value]) -> StatementTable {
    let columns = items
        .iter()
        .enumerate()
        .map(|(i, item)| column_label(item, i))
        .collect();
    let mut table = StatementTable::new(columns);

    for (col, item) in items.iter().enumerate() {
        let Some(fields) = item.as_object() else {
            continue;
        };
        for (key, value) in fields {
            let Some(number) = value.as_f64() else {
                continue;
            };
            let label = FIELD_LABELS
                .iter()
                .find(|(field, _)| *field == key.as_str())
                .map_or(key.as_str(), |(_, label)| *label);
            table.set(label, col, number);
        }
    }

    table
}

pub fn company_name(profile: &Value) -> Option<String> {
    let entry = match profile {
        Value::Array(items) => items.first()?,
        other => other,
    };
    entry
        .get("companyName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts both the flat array and the `{"historical": [...]}` shapes.
pub fn bars_from_json(value: &Value) -> Vec<PriceBar> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => other
            .get("historical")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
    };
    items
        .iter()
        .filter_map(|item| {
            let date = item.get("date")?.as_str()?;
            let date = NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()?;
            let close = item
                .get("adjClose")
                .or_else(|| item.get("close"))?
                .as_f64()?;
            Some(PriceBar::new(date, close))
        })
        .collect()
}

impl FundamentalsPort for FmpAdapter {
    fn fetch_financials(&self, symbol: &str) -> Result<CompanyFinancials, ScreenerError> {
        let symbol = symbol.to_uppercase();
        let name = match self.get(&format!("profile?symbol={symbol}")) {
            Ok(profile) => company_name(&profile),
            Err(FetchError::RateLimitExceeded) => return Err(FetchError::RateLimitExceeded.into()),
            Err(e) => {
                tracing::debug!(ticker = %symbol, error = %e, "profile unavailable");
                None
            }
        };
        let income_statement = self.statement("income-statement", &symbol)?;
        let balance_sheet = self.statement("balance-sheet-statement", &symbol)?;

        Ok(CompanyFinancials {
            name: name.unwrap_or_else(|| symbol.clone()),
            income_statement,
            balance_sheet,
        })
    }

    fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScreenerError> {
        let symbol = symbol.to_uppercase();
        let value = self.get(&format!(
            "historical-price-eod/full?symbol={symbol}&from={}",
            start.format("%Y-%m-%d")
        ))?;
        let mut bars: Vec<PriceBar> = bars_from_json(&value)
            .into_iter()
            .filter(|b| b.date >= start)
            .collect();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
