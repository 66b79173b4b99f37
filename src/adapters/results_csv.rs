//! Results CSV persistence.
//!
//! Files start with a UTF-8 byte-order mark so spreadsheet tools pick up the
//! encoding. Missing growth values are written as empty cells.

use crate::domain::crossover::CrossRecord;
use crate::domain::error::ScreenerError;
use crate::domain::record::{TickerRecord, CSV_HEADER};
use crate::domain::result_set::ResultSet;
use chrono::NaiveDateTime;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const BOM: &str = "\u{feff}";

fn write_error(path: &Path, reason: impl ToString) -> ScreenerError {
    ScreenerError::ResultsWrite {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn read_error(path: &Path, reason: impl ToString) -> ScreenerError {
    ScreenerError::ResultsRead {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, ScreenerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
        }
    }
    let mut out = BufWriter::new(File::create(path).map_err(|e| write_error(path, e))?);
    out.write_all(BOM.as_bytes())
        .map_err(|e| write_error(path, e))?;
    Ok(out)
}

/// Writes records in the given order. The header is always written, so an
/// empty slice still yields a valid file.
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<(), ScreenerError>
where
    I: IntoIterator<Item = &'a TickerRecord>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(create(path)?);
    wtr.write_record(CSV_HEADER)
        .map_err(|e| write_error(path, e))?;
    for record in records {
        wtr.serialize(record).map_err(|e| write_error(path, e))?;
    }
    wtr.flush().map_err(|e| write_error(path, e))?;
    Ok(())
}

pub fn write_results(path: &Path, results: &ResultSet) -> Result<(), ScreenerError> {
    write_records(path, results.records())?;
    tracing::info!(path = %path.display(), rows = results.len(), "results written");
    Ok(())
}

pub fn write_filtered(path: &Path, records: &[&TickerRecord]) -> Result<(), ScreenerError> {
    write_records(path, records.iter().copied())?;
    tracing::info!(path = %path.display(), rows = records.len(), "filtered view exported");
    Ok(())
}

pub fn read_results(path: &Path) -> Result<ResultSet, ScreenerError> {
    let content = fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    let content = content.trim_start_matches(BOM);

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr.headers().map_err(|e| read_error(path, e))?.clone();
    if let Some(missing) = CSV_HEADER
        .iter()
        .find(|col| !headers.iter().any(|h| h.trim() == **col))
    {
        return Err(read_error(path, format!("missing column '{}'", missing)));
    }

    let mut records = Vec::new();
    for (line, row) in rdr.deserialize::<TickerRecord>().enumerate() {
        let record = row.map_err(|e| read_error(path, format!("row {}: {}", line + 1, e)))?;
        records.push(record);
    }
    tracing::debug!(path = %path.display(), rows = records.len(), "results loaded");
    Ok(ResultSet::new(records))
}

/// `screening_result_YYYYMMDD_HHMM.csv`
pub fn timestamped_name(now: NaiveDateTime) -> String {
    format!("screening_result_{}.csv", now.format("%Y%m%d_%H%M"))
}

pub fn write_cross_records(path: &Path, records: &[CrossRecord]) -> Result<(), ScreenerError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(create(path)?);
    wtr.write_record([
        "ticker",
        "latest_golden_cross",
        "latest_death_cross",
        "last_close",
        "sma_short",
        "sma_long",
    ])
    .map_err(|e| write_error(path, e))?;
    for record in records {
        wtr.serialize(record).map_err(|e| write_error(path, e))?;
    }
    wtr.flush().map_err(|e| write_error(path, e))?;
    tracing::info!(path = %path.display(), rows = records.len(), "crossover results written");
    Ok(())
}
