//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::{HtmlReportAdapter, TOP_N};
use crate::adapters::results_csv;
use crate::domain::config_validation::{validate_config, PROVIDERS};
use crate::domain::crossover::{CrossoverConfig, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::error::ScreenerError;
use crate::domain::record::TickerRecord;
use crate::domain::resolver::LabelCandidates;
use crate::domain::result_set::{top_by_roce, FilterView};
use crate::domain::screener::{self, ScreenSettings, DEFAULT_PAUSE};
use crate::domain::thresholds::{
    Thresholds, DEFAULT_OP_INCOME_YOY_MIN, DEFAULT_REVENUE_YOY_MIN, DEFAULT_ROCE_MIN,
};
use crate::domain::tickers::{load_tickers, parse_ticker_csv, TickerList, TickerSource};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::FundamentalsPort;
use crate::ports::report_port::{ReportContext, ReportPort};

pub const DEFAULT_TICKERS_FILE: &str = "tickers.txt";
pub const DEFAULT_OUTPUT: &str = "results.csv";
pub const DEFAULT_FILTERED_OUTPUT: &str = "filtered_results.csv";
pub const DEFAULT_CROSS_START: &str = "2025-01-01";

#[derive(Parser, Debug)]
#[command(
    name = "roce-screener",
    about = "Screen equities on ROCE, revenue growth and operating-income growth"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch fundamentals for every ticker and write the results CSV
    Screen {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Ticker file, one symbol per line
        #[arg(short, long)]
        tickers: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        /// Data provider: fmp or csv
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Reload a results CSV and re-filter it without refetching
    View {
        /// Results CSV written by `screen`
        #[arg(default_value = DEFAULT_OUTPUT)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true)]
        roce_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        revenue_yoy_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        op_income_yoy_min: Option<f64>,
        /// Also require the pass flag stored by the screening run
        #[arg(long)]
        only_passing: bool,
        /// Write the filtered view to this CSV
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_FILTERED_OUTPUT)]
        export: Option<PathBuf>,
        /// Write an HTML dashboard to this path
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Find 20/60-day moving-average golden crosses
    Cross {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        tickers: Option<PathBuf>,
        /// Defaults to screening_result_YYYYMMDD_HHMM.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// First date of price history (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate a configuration file
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Where tickers and statements come from, after CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub provider: String,
    pub data_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            tickers,
            output,
            limit,
            provider,
            data_dir,
        } => run_screen(
            config.as_deref(),
            tickers.as_deref(),
            output.as_deref(),
            limit,
            provider.as_deref(),
            data_dir,
        ),
        Command::View {
            input,
            config,
            roce_min,
            revenue_yoy_min,
            op_income_yoy_min,
            only_passing,
            export,
            html,
        } => {
            let overrides = ThresholdOverrides {
                roce_min,
                revenue_yoy_min,
                op_income_yoy_min,
            };
            run_view(
                &input,
                config.as_deref(),
                overrides,
                only_passing,
                export.as_deref(),
                html.as_deref(),
            )
        }
        Command::Cross {
            config,
            tickers,
            output,
            start,
            limit,
            provider,
            data_dir,
        } => run_cross(
            config.as_deref(),
            tickers.as_deref(),
            output.as_deref(),
            start.as_deref(),
            limit,
            provider.as_deref(),
            data_dir,
        ),
        Command::CheckConfig { config } => run_check_config(&config),
    }
}

fn fail(err: ScreenerError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Loads and validates a config file; no path means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ScreenerError> {
    let adapter = match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_thresholds(config: &dyn ConfigPort) -> Thresholds {
    Thresholds {
        roce_min: config.get_double("thresholds", "roce_min", DEFAULT_ROCE_MIN),
        revenue_yoy_min: config.get_double(
            "thresholds",
            "revenue_yoy_min",
            DEFAULT_REVENUE_YOY_MIN,
        ),
        op_income_yoy_min: config.get_double(
            "thresholds",
            "op_income_yoy_min",
            DEFAULT_OP_INCOME_YOY_MIN,
        ),
    }
}

/// Configured candidate lists replace the built-in ones per concept.
pub fn build_labels(config: &dyn ConfigPort) -> LabelCandidates {
    let defaults = LabelCandidates::default();
    let list = |key: &str, fallback: Vec<String>| config.get_list("labels", key).unwrap_or(fallback);
    LabelCandidates {
        revenue: list("revenue", defaults.revenue),
        operating_income: list("operating_income", defaults.operating_income),
        total_assets: list("total_assets", defaults.total_assets),
        current_liabilities: list("current_liabilities", defaults.current_liabilities),
    }
}

pub fn build_pause(config: &dyn ConfigPort) -> Duration {
    let default_ms = DEFAULT_PAUSE.as_millis() as i64;
    let ms = config.get_int("screener", "pause_ms", default_ms).max(0);
    Duration::from_millis(ms as u64)
}

pub fn build_screen_settings(config: &dyn ConfigPort) -> ScreenSettings {
    ScreenSettings {
        thresholds: build_thresholds(config),
        labels: build_labels(config),
        pause: build_pause(config),
    }
}

pub fn build_crossover_config(config: &dyn ConfigPort) -> CrossoverConfig {
    let window = |key: &str, default: usize| {
        let value = config.get_int("crossover", key, default as i64);
        usize::try_from(value).unwrap_or(default)
    };
    CrossoverConfig {
        short_window: window("short_window", DEFAULT_SHORT_WINDOW),
        long_window: window("long_window", DEFAULT_LONG_WINDOW),
    }
}

pub fn build_start_date(
    config: &dyn ConfigPort,
    start_override: Option<&str>,
) -> Result<NaiveDate, ScreenerError> {
    let raw = start_override
        .map(str::to_string)
        .or_else(|| config.get_string("crossover", "start_date"))
        .unwrap_or_else(|| DEFAULT_CROSS_START.to_string());
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ScreenerError::ConfigInvalid {
        section: "crossover".into(),
        key: "start_date".into(),
        reason: format!("invalid date '{}' (expected YYYY-MM-DD)", raw.trim()),
    })
}

pub fn build_source_settings(
    config: &dyn ConfigPort,
    provider_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
) -> Result<SourceSettings, ScreenerError> {
    let provider = provider_override
        .map(str::to_string)
        .or_else(|| config.get_string("source", "provider"))
        .map(|p| p.trim().to_lowercase())
        .unwrap_or_else(|| "fmp".to_string());
    if !PROVIDERS.contains(&provider.as_str()) {
        return Err(ScreenerError::ConfigInvalid {
            section: "source".into(),
            key: "provider".into(),
            reason: format!("unknown provider '{}', expected one of {:?}", provider, PROVIDERS),
        });
    }

    let non_empty = |key: &str| {
        config
            .get_string("source", key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    Ok(SourceSettings {
        data_dir: data_dir_override.or_else(|| non_empty("data_dir").map(PathBuf::from)),
        api_key: non_empty("api_key"),
        base_url: non_empty("base_url"),
        provider,
    })
}

pub fn build_data_port(source: &SourceSettings) -> Result<Box<dyn FundamentalsPort>, ScreenerError> {
    match source.provider.as_str() {
        "csv" => {
            let dir = source
                .data_dir
                .clone()
                .ok_or_else(|| ScreenerError::ConfigInvalid {
                    section: "source".into(),
                    key: "data_dir".into(),
                    reason: "required for the csv provider".into(),
                })?;
            tracing::info!(data_dir = %dir.display(), "using CSV data source");
            Ok(Box::new(CsvAdapter::new(dir)))
        }
        #[cfg(feature = "fmp")]
        "fmp" => {
            use crate::adapters::fmp_adapter::FmpAdapter;

            let adapter = match &source.api_key {
                Some(key) => FmpAdapter::new(key.clone())?,
                None => FmpAdapter::from_env()?,
            };
            let adapter = match &source.base_url {
                Some(url) => adapter.with_base_url(url.clone()),
                None => adapter,
            };
            tracing::info!("using Financial Modeling Prep data source");
            Ok(Box::new(adapter))
        }
        other => Err(ScreenerError::ConfigInvalid {
            section: "source".into(),
            key: "provider".into(),
            reason: format!("provider '{other}' is not available in this build"),
        }),
    }
}

/// Ticker file and limit from CLI overrides, then config, then defaults.
pub fn resolve_tickers(
    config: &dyn ConfigPort,
    tickers_override: Option<&Path>,
    limit_override: Option<usize>,
) -> Result<TickerList, ScreenerError> {
    let path = tickers_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("screener", "tickers_file").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TICKERS_FILE));
    let fallback = config
        .get_string("screener", "fallback_tickers")
        .map(|s| parse_ticker_csv(&s))
        .unwrap_or_default();
    let limit = limit_override.or_else(|| {
        let configured = config.get_int("screener", "max_tickers", 0);
        (configured > 0).then_some(configured as usize)
    });
    load_tickers(&path, &fallback, limit)
}

fn output_path(config: &dyn ConfigPort, output_override: Option<&Path>) -> PathBuf {
    output_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("screener", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

fn fmt_opt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

pub fn print_records(records: &[&TickerRecord]) {
    println!(
        "{:<8} {:<28} {:>9} {:>9} {:>9} {:>5}",
        "TICKER", "NAME", "ROCE%", "REV_YOY%", "OP_YOY%", "PASS"
    );
    for r in records {
        let name: String = r.name.chars().take(28).collect();
        println!(
            "{:<8} {:<28} {:>9.2} {:>9} {:>9} {:>5}",
            r.ticker,
            name,
            r.roce_pct,
            fmt_opt_pct(r.revenue_yoy_pct),
            fmt_opt_pct(r.op_income_yoy_pct),
            if r.pass_all { "yes" } else { "no" }
        );
    }
}

fn print_top(records: &[&TickerRecord]) {
    let top = top_by_roce(records, TOP_N);
    if top.is_empty() {
        return;
    }
    println!("\nTop {} by ROCE:", top.len());
    for (i, r) in top.iter().enumerate() {
        println!("{:>3}. {:<8} {:>8.2}%", i + 1, r.ticker, r.roce_pct);
    }
}

fn run_screen(
    config_path: Option<&Path>,
    tickers_override: Option<&Path>,
    output_override: Option<&Path>,
    limit: Option<usize>,
    provider: Option<&str>,
    data_dir: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let settings = build_screen_settings(&config);
    let tickers = match resolve_tickers(&config, tickers_override, limit) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    if tickers.source == TickerSource::Fallback {
        eprintln!("Ticker file not found, using {} fallback tickers", tickers.count());
    }
    let port = match build_source_settings(&config, provider, data_dir)
        .and_then(|source| build_data_port(&source))
    {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    eprintln!("Screening {} tickers", tickers.count());
    let outcome = screener::run(&tickers.tickers, port.as_ref(), &settings);

    for skipped in &outcome.skipped {
        eprintln!("  skipped {}: {}", skipped.ticker, skipped.reason);
    }
    if outcome.results.is_empty() {
        eprintln!("no tickers produced a valid record");
        return ExitCode::SUCCESS;
    }

    let output = output_path(&config, output_override);
    if let Err(e) = results_csv::write_results(&output, &outcome.results) {
        return fail(e);
    }

    let all: Vec<&TickerRecord> = outcome.results.records().iter().collect();
    print_records(&all);
    eprintln!(
        "screened {} records ({} passing)",
        outcome.results.len(),
        outcome.results.passing_count()
    );
    eprintln!("Results written to {}", output.display());
    ExitCode::SUCCESS
}

/// Per-threshold overrides from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdOverrides {
    pub roce_min: Option<f64>,
    pub revenue_yoy_min: Option<f64>,
    pub op_income_yoy_min: Option<f64>,
}

impl ThresholdOverrides {
    pub fn apply(&self, base: Thresholds) -> Thresholds {
        Thresholds {
            roce_min: self.roce_min.unwrap_or(base.roce_min),
            revenue_yoy_min: self.revenue_yoy_min.unwrap_or(base.revenue_yoy_min),
            op_income_yoy_min: self.op_income_yoy_min.unwrap_or(base.op_income_yoy_min),
        }
    }
}

fn run_view(
    input: &Path,
    config_path: Option<&Path>,
    overrides: ThresholdOverrides,
    only_passing: bool,
    export: Option<&Path>,
    html: Option<&Path>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let results = match results_csv::read_results(input) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let view = FilterView {
        thresholds: overrides.apply(build_thresholds(&config)),
        only_passing,
    };
    let filtered = view.apply(&results);

    eprintln!("filtered {} / {}", filtered.len(), results.len());
    print_records(&filtered);
    print_top(&filtered);

    if let Some(path) = export {
        if let Err(e) = results_csv::write_filtered(path, &filtered) {
            return fail(e);
        }
        eprintln!("Filtered view exported to {}", path.display());
    }

    if let Some(path) = html {
        let ctx = ReportContext {
            view: &view,
            filtered: &filtered,
            total: results.len(),
        };
        if let Err(e) = HtmlReportAdapter::new().write(&ctx, &path.to_string_lossy()) {
            return fail(e);
        }
        eprintln!("Dashboard written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_cross(
    config_path: Option<&Path>,
    tickers_override: Option<&Path>,
    output_override: Option<&Path>,
    start: Option<&str>,
    limit: Option<usize>,
    provider: Option<&str>,
    data_dir: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let cross_config = build_crossover_config(&config);
    let start_date = match build_start_date(&config, start) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let tickers = match resolve_tickers(&config, tickers_override, limit) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    let port = match build_source_settings(&config, provider, data_dir)
        .and_then(|source| build_data_port(&source))
    {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    eprintln!(
        "Scanning {} tickers for SMA{}/SMA{} crosses since {}",
        tickers.count(),
        cross_config.short_window,
        cross_config.long_window,
        start_date
    );
    let outcome = screener::run_crossover(
        &tickers.tickers,
        port.as_ref(),
        &cross_config,
        start_date,
        build_pause(&config),
    );

    for skipped in &outcome.skipped {
        eprintln!("  skipped {}: {}", skipped.ticker, skipped.reason);
    }
    if outcome.records.is_empty() {
        eprintln!("no tickers produced a valid record");
        return ExitCode::SUCCESS;
    }

    let output = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(results_csv::timestamped_name(Local::now().naive_local())));
    if let Err(e) = results_csv::write_cross_records(&output, &outcome.records) {
        return fail(e);
    }

    println!("{:<8} {:>12} {:>12} {:>10}", "TICKER", "GOLDEN", "DEATH", "CLOSE");
    for r in &outcome.records {
        let date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
        println!(
            "{:<8} {:>12} {:>12} {:>10.2}",
            r.ticker,
            date(r.latest_golden_cross),
            date(r.latest_death_cross),
            r.last_close
        );
    }
    let golden = outcome
        .records
        .iter()
        .filter(|r| r.latest_golden_cross.is_some())
        .count();
    eprintln!(
        "{} of {} tickers had a golden cross ({} currently in uptrend)",
        golden,
        outcome.records.len(),
        outcome.records.iter().filter(|r| r.in_uptrend()).count()
    );
    eprintln!("Results written to {}", output.display());
    ExitCode::SUCCESS
}

fn run_check_config(config_path: &Path) -> ExitCode {
    let config = match load_config(Some(config_path)) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let source = match build_source_settings(&config, None, None) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let thresholds = build_thresholds(&config);
    let cross = build_crossover_config(&config);

    eprintln!("\nThresholds:");
    eprintln!("  roce_min:          {}", thresholds.roce_min);
    eprintln!("  revenue_yoy_min:   {}", thresholds.revenue_yoy_min);
    eprintln!("  op_income_yoy_min: {}", thresholds.op_income_yoy_min);
    eprintln!("\nSource: {}", source.provider);
    if let Some(dir) = &source.data_dir {
        eprintln!("  data_dir: {}", dir.display());
    }
    eprintln!("\nCrossover: SMA{} / SMA{}", cross.short_window, cross.long_window);
    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ini: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(ini).unwrap()
    }

    #[test]
    fn cli_parses_view_overrides() {
        let cli = Cli::try_parse_from([
            "roce-screener",
            "--log-json",
            "view",
            "out.csv",
            "--roce-min",
            "20",
            "--op-income-yoy-min",
            "-5",
            "--only-passing",
            "--export",
        ])
        .unwrap();
        assert!(cli.log_json);
        match cli.command {
            Command::View {
                input,
                roce_min,
                op_income_yoy_min,
                only_passing,
                export,
                html,
                ..
            } => {
                assert_eq!(input, PathBuf::from("out.csv"));
                assert_eq!(roce_min, Some(20.0));
                assert_eq!(op_income_yoy_min, Some(-5.0));
                assert!(only_passing);
                assert_eq!(export, Some(PathBuf::from(DEFAULT_FILTERED_OUTPUT)));
                assert_eq!(html, None);
            }
            other => panic!("expected view, got {:?}", other),
        }
    }

    #[test]
    fn thresholds_default_and_override() {
        assert_eq!(build_thresholds(&FileConfigAdapter::empty()), Thresholds::default());
        let t = build_thresholds(&config("[thresholds]\nroce_min = 20\n"));
        assert_eq!(t.roce_min, 20.0);
        assert_eq!(t.revenue_yoy_min, DEFAULT_REVENUE_YOY_MIN);

        let overridden = ThresholdOverrides {
            revenue_yoy_min: Some(0.0),
            ..Default::default()
        }
        .apply(t);
        assert_eq!(overridden.roce_min, 20.0);
        assert_eq!(overridden.revenue_yoy_min, 0.0);
    }

    #[test]
    fn labels_replace_per_concept() {
        let labels = build_labels(&config("[labels]\nrevenue = Net Sales, Sales\n"));
        assert_eq!(labels.revenue, vec!["Net Sales", "Sales"]);
        assert_eq!(labels.total_assets, LabelCandidates::default().total_assets);
    }

    #[test]
    fn pause_and_windows_from_config() {
        let c = config("[screener]\npause_ms = 0\n[crossover]\nshort_window = 5\nlong_window = 10\n");
        assert_eq!(build_pause(&c), Duration::ZERO);
        assert_eq!(
            build_crossover_config(&c),
            CrossoverConfig {
                short_window: 5,
                long_window: 10
            }
        );
        assert_eq!(build_pause(&FileConfigAdapter::empty()), DEFAULT_PAUSE);
    }

    #[test]
    fn start_date_override_wins() {
        let c = config("[crossover]\nstart_date = 2024-06-01\n");
        assert_eq!(
            build_start_date(&c, None).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(
            build_start_date(&c, Some("2025-02-03")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
        );
        assert_eq!(
            build_start_date(&FileConfigAdapter::empty(), None).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert!(build_start_date(&c, Some("03/02/2025")).is_err());
    }

    #[test]
    fn source_settings_overrides() {
        let c = config("[source]\nprovider = fmp\napi_key = abc\n");
        let s = build_source_settings(&c, Some("CSV"), Some(PathBuf::from("data"))).unwrap();
        assert_eq!(s.provider, "csv");
        assert_eq!(s.data_dir, Some(PathBuf::from("data")));
        assert_eq!(s.api_key, Some("abc".to_string()));

        assert!(build_source_settings(&c, Some("yahoo"), None).is_err());
    }

    #[test]
    fn csv_port_requires_data_dir() {
        let s = SourceSettings {
            provider: "csv".into(),
            data_dir: None,
            api_key: None,
            base_url: None,
        };
        assert!(matches!(
            build_data_port(&s),
            Err(ScreenerError::ConfigInvalid { .. })
        ));
    }
}
