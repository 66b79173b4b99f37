//! INI file configuration adapter.

use crate::domain::error::ScreenerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScreenerError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| ScreenerError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ScreenerError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ScreenerError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// An adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[screener]
tickers_file = sp500.txt
max_tickers = 50

[thresholds]
roce_min = 13.5

[source]
provider = fmp
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("screener", "tickers_file"),
            Some("sp500.txt".to_string())
        );
        assert_eq!(adapter.get_int("screener", "max_tickers", 0), 50);
        assert_eq!(adapter.get_double("thresholds", "roce_min", 0.0), 13.5);
        assert_eq!(
            adapter.get_string("source", "provider"),
            Some("fmp".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[screener]\noutput = out.csv\n").unwrap();
        assert_eq!(adapter.get_string("screener", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn numeric_getters_fall_back_on_bad_values() {
        let adapter =
            FileConfigAdapter::from_string("[screener]\nmax_tickers = lots\npause_ms = soon\n")
                .unwrap();
        assert_eq!(adapter.get_int("screener", "max_tickers", 42), 42);
        assert_eq!(adapter.get_double("screener", "pause_ms", 99.9), 99.9);
        assert_eq!(adapter.get_int("screener", "absent", 7), 7);
    }

    #[test]
    fn get_list_splits_and_trims() {
        let adapter = FileConfigAdapter::from_string(
            "[labels]\nrevenue = Total Revenue , Revenues,,Sales\nblank = \n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_list("labels", "revenue"),
            Some(vec![
                "Total Revenue".to_string(),
                "Revenues".to_string(),
                "Sales".to_string()
            ])
        );
        assert_eq!(adapter.get_list("labels", "blank"), None);
        assert_eq!(adapter.get_list("labels", "missing"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[crossover]\nstart_date = 2025-01-01\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("crossover", "start_date"),
            Some("2025-01-01".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/screener.ini");
        assert!(matches!(result, Err(ScreenerError::ConfigParse { .. })));
    }

    #[test]
    fn load_errors_are_debug_printable() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/screener.ini").unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigParse { .. }));
        let adapter = FileConfigAdapter::from_string("[source]\nprovider = csv\n").unwrap();
        assert!(format!("{:?}", adapter).contains("provider"));
    }

    #[test]
    fn empty_adapter_uses_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("screener", "output"), None);
        assert_eq!(adapter.get_double("thresholds", "roce_min", 13.0), 13.0);
    }
}
