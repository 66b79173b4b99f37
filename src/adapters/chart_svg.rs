//! Inline SVG bar charts for the HTML dashboard.

use crate::domain::record::TickerRecord;

const CHART_WIDTH: f64 = 720.0;
const BAR_HEIGHT: f64 = 18.0;
const BAR_GAP: f64 = 8.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 70.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 20.0;

const ROCE_COLOR: &str = "#2563eb";
const REVENUE_COLOR: &str = "#16a34a";
const OP_INCOME_COLOR: &str = "#f59e0b";
const NEGATIVE_COLOR: &str = "#dc2626";

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Maps values onto `[MARGIN_LEFT, CHART_WIDTH - MARGIN_RIGHT]`, keeping zero
/// inside the range so negative bars extend left of the axis.
struct Scale {
    min: f64,
    span: f64,
}

impl Scale {
    fn new<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self {
            min,
            span: (max - min).max(1.0),
        }
    }

    fn x(&self, value: f64) -> f64 {
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (value - self.min) / self.span * plot_width
    }
}

fn open_svg(height: f64, title: &str) -> String {
    let mut svg = format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, height, CHART_WIDTH, height
    );
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"18\" font-size=\"13\" fill=\"#333\">{}</text>\n",
        MARGIN_LEFT,
        escape_xml(title)
    ));
    svg
}

fn axis(svg: &mut String, scale: &Scale, height: f64) {
    let x0 = scale.x(0.0);
    svg.push_str(&format!(
        "  <line x1=\"{:.1}\" y1=\"{}\" x2=\"{:.1}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        x0,
        MARGIN_TOP - 4.0,
        x0,
        height - MARGIN_BOTTOM
    ));
}

fn bar(svg: &mut String, scale: &Scale, y: f64, height: f64, value: f64, color: &str) {
    let x0 = scale.x(0.0);
    let x1 = scale.x(value);
    let fill = if value < 0.0 { NEGATIVE_COLOR } else { color };
    svg.push_str(&format!(
        "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
        x0.min(x1),
        y,
        (x1 - x0).abs(),
        height,
        fill
    ));
}

fn value_label(svg: &mut String, scale: &Scale, y: f64, value: Option<f64>) {
    let (x, text) = match value {
        Some(v) => (scale.x(v.max(0.0)) + 4.0, format!("{:.1}%", v)),
        None => (scale.x(0.0) + 4.0, "n/a".to_string()),
    };
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        x, y, text
    ));
}

fn ticker_label(svg: &mut String, y: f64, ticker: &str) {
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\" fill=\"#333\">{}</text>\n",
        MARGIN_LEFT - 6.0,
        y,
        escape_xml(ticker)
    ));
}

/// Horizontal ROCE bars, one per record in the given order.
pub fn roce_bar_chart(records: &[&TickerRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let height = MARGIN_TOP + records.len() as f64 * (BAR_HEIGHT + BAR_GAP) + MARGIN_BOTTOM;
    let scale = Scale::new(records.iter().map(|r| r.roce_pct));

    let mut svg = open_svg(height, "ROCE (%)");
    axis(&mut svg, &scale, height);
    for (i, record) in records.iter().enumerate() {
        let y = MARGIN_TOP + i as f64 * (BAR_HEIGHT + BAR_GAP);
        let text_y = y + BAR_HEIGHT * 0.75;
        ticker_label(&mut svg, text_y, &record.ticker);
        bar(&mut svg, &scale, y, BAR_HEIGHT, record.roce_pct, ROCE_COLOR);
        value_label(&mut svg, &scale, text_y, Some(record.roce_pct));
    }
    svg.push_str("</svg>");
    svg
}

/// Paired revenue and operating-income growth bars per record. Missing
/// growth draws no bar and an `n/a` label.
pub fn yoy_bar_chart(records: &[&TickerRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let group = 2.0 * BAR_HEIGHT + BAR_GAP;
    let height = MARGIN_TOP + records.len() as f64 * group + MARGIN_BOTTOM;
    let scale = Scale::new(
        records
            .iter()
            .flat_map(|r| [r.revenue_yoy_pct, r.op_income_yoy_pct])
            .flatten(),
    );

    let mut svg = open_svg(height, "YoY growth (%): revenue / operating income");
    axis(&mut svg, &scale, height);
    for (i, record) in records.iter().enumerate() {
        let y = MARGIN_TOP + i as f64 * group;
        ticker_label(&mut svg, y + BAR_HEIGHT, &record.ticker);

        let series = [
            (record.revenue_yoy_pct, REVENUE_COLOR),
            (record.op_income_yoy_pct, OP_INCOME_COLOR),
        ];
        for (j, (value, color)) in series.into_iter().enumerate() {
            let bar_y = y + j as f64 * BAR_HEIGHT;
            if let Some(v) = value {
                bar(&mut svg, &scale, bar_y, BAR_HEIGHT - 2.0, v, color);
            }
            value_label(&mut svg, &scale, bar_y + BAR_HEIGHT * 0.7, value);
        }
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str, roce: f64, rev: Option<f64>, op: Option<f64>) -> TickerRecord {
        TickerRecord {
            ticker: ticker.into(),
            name: ticker.into(),
            year_latest: 2023,
            year_prev: 2022,
            revenue_latest: 0.0,
            revenue_prev: 0.0,
            revenue_yoy_pct: rev,
            op_income_latest: 0.0,
            op_income_prev: 0.0,
            op_income_yoy_pct: op,
            total_assets_latest: 0.0,
            current_liabilities_latest: 0.0,
            capital_employed: 1.0,
            roce_pct: roce,
            pass_roce: true,
            pass_revenue_yoy: true,
            pass_op_yoy: true,
            pass_all: true,
        }
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(roce_bar_chart(&[]).is_empty());
        assert!(yoy_bar_chart(&[]).is_empty());
    }

    #[test]
    fn roce_chart_has_one_bar_per_record() {
        let a = record("AAA", 25.0, None, None);
        let b = record("B&B", 15.0, None, None);
        let svg = roce_bar_chart(&[&a, &b]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // background rect plus two bars
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("B&amp;B"));
        assert!(svg.contains("25.0%"));
    }

    #[test]
    fn yoy_chart_skips_missing_values() {
        let a = record("AAA", 20.0, Some(30.0), None);
        let svg = yoy_bar_chart(&[&a]);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("n/a"));
        assert!(svg.contains("30.0%"));
    }

    #[test]
    fn negative_growth_uses_negative_color() {
        let a = record("AAA", 20.0, Some(-12.5), Some(5.0));
        let svg = yoy_bar_chart(&[&a]);
        assert!(svg.contains(NEGATIVE_COLOR));
        assert!(svg.contains("-12.5%"));
    }

    #[test]
    fn scale_keeps_zero_in_range() {
        let scale = Scale::new([10.0, 20.0]);
        assert_eq!(scale.x(0.0), MARGIN_LEFT);
        let scale = Scale::new([-10.0, 10.0]);
        assert!(scale.x(0.0) > MARGIN_LEFT);
    }

    #[test]
    fn escape_xml_handles_markup() {
        assert_eq!(escape_xml("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
