//! HTML dashboard adapter implementing ReportPort.
//!
//! Produces a single self-contained page: the active filter, the filtered
//! table sorted by ROCE, and inline SVG charts for the top entries.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::adapters::chart_svg::{roce_bar_chart, yoy_bar_chart};
use crate::domain::error::ScreenerError;
use crate::domain::record::TickerRecord;
use crate::domain::result_set::top_by_roce;
use crate::ports::report_port::{ReportContext, ReportPort};

pub const TOP_N: usize = 10;

fn fmt_money(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else {
        (value, "")
    };
    format!("{:.2}{}", scaled, suffix)
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v))
}

/// One table row, preformatted for display.
struct DashboardRow<'a> {
    ticker: &'a str,
    name: &'a str,
    years: String,
    revenue: String,
    revenue_yoy: String,
    op_income: String,
    op_income_yoy: String,
    capital_employed: String,
    roce: String,
    pass_roce: bool,
    pass_revenue_yoy: bool,
    pass_op_yoy: bool,
    pass_all: bool,
}

impl<'a> DashboardRow<'a> {
    fn from_record(r: &'a TickerRecord) -> Self {
        Self {
            ticker: &r.ticker,
            name: &r.name,
            years: format!("{}/{}", r.year_prev, r.year_latest),
            revenue: fmt_money(r.revenue_latest),
            revenue_yoy: fmt_pct(r.revenue_yoy_pct),
            op_income: fmt_money(r.op_income_latest),
            op_income_yoy: fmt_pct(r.op_income_yoy_pct),
            capital_employed: fmt_money(r.capital_employed),
            roce: format!("{:.2}%", r.roce_pct),
            pass_roce: r.pass_roce,
            pass_revenue_yoy: r.pass_revenue_yoy,
            pass_op_yoy: r.pass_op_yoy,
            pass_all: r.pass_all,
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    roce_min: f64,
    revenue_yoy_min: f64,
    op_income_yoy_min: f64,
    only_passing: bool,
    shown: usize,
    total: usize,
    top_count: usize,
    roce_svg: String,
    yoy_svg: String,
    rows: Vec<DashboardRow<'a>>,
}

pub fn render(ctx: &ReportContext<'_>) -> Result<String, ScreenerError> {
    let top = top_by_roce(ctx.filtered, TOP_N);
    let thresholds = &ctx.view.thresholds;
    let template = DashboardTemplate {
        roce_min: thresholds.roce_min,
        revenue_yoy_min: thresholds.revenue_yoy_min,
        op_income_yoy_min: thresholds.op_income_yoy_min,
        only_passing: ctx.view.only_passing,
        shown: ctx.filtered.len(),
        total: ctx.total,
        top_count: top.len(),
        roce_svg: roce_bar_chart(&top),
        yoy_svg: yoy_bar_chart(&top),
        rows: ctx.filtered.iter().map(|r| DashboardRow::from_record(r)).collect(),
    };
    template.render().map_err(|e| ScreenerError::Report {
        reason: format!("cannot render dashboard: {}", e),
    })
}

#[derive(Default)]
pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &str) -> Result<(), ScreenerError> {
        let html = render(ctx)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ScreenerError::Report {
                    reason: format!("cannot create {}: {}", parent.display(), e),
                })?;
            }
        }
        fs::write(path, html).map_err(|e| ScreenerError::Report {
            reason: format!("cannot write {}: {}", path.display(), e),
        })?;
        tracing::info!(path = %output_path, rows = ctx.filtered.len(), "HTML report written");
        Ok(())
    }
}
