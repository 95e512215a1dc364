//! CSV load and normalization.
//!
//! This module turns the pre-processed indicator CSV into an immutable
//! `Dataset` that downstream code can slice without re-validating anything.
//!
//! Design goals:
//! - **Case-insensitive headers**: identifiers are lowercased (and BOM-stripped)
//!   once here, so lookups never re-check case
//! - **Row-level tolerance**: a record whose period cannot be parsed is dropped
//!   and reported, not silently miscomputed and not fatal
//! - **Catalog validation at load**: indicators missing from the header are
//!   recorded once, so views can explain their absence instead of erroring
//! - **Load-once semantics**: the dataset is memoized for the process lifetime
//!   behind a read-only accessor

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use csv::StringRecord;

use crate::data::period::year_from_period;
use crate::domain::{Indicator, Record, YearRange};
use crate::error::AppError;

/// Environment variable overriding the default CSV location.
pub const DATA_ENV_VAR: &str = "ECON_DASH_DATA";

/// Default CSV file name, resolved relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "lka_processed.csv";

/// A row-level problem encountered during load.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub period: Option<String>,
    pub message: String,
}

/// The loaded dataset: ordered records plus what the load learned about them.
///
/// Immutable after load; safe to share read-only across views.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Records in file order, each with a normalized `year`.
    pub records: Vec<Record>,
    /// Catalog indicators whose column exists in the CSV.
    pub available: Vec<Indicator>,
    /// Catalog indicators absent from the CSV (non-fatal; views explain this).
    pub missing: Vec<Indicator>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl Dataset {
    pub fn is_available(&self, indicator: Indicator) -> bool {
        self.available.contains(&indicator)
    }

    /// Min/max year across all records.
    pub fn year_bounds(&self) -> Option<YearRange> {
        let lo = self.records.iter().map(|r| r.year).min()?;
        let hi = self.records.iter().map(|r| r.year).max()?;
        Some(YearRange::new(lo, hi))
    }

    /// One-line load summary for status surfaces.
    pub fn summary_line(&self) -> String {
        let mut out = format!(
            "rows: {} read, {} used, {} dropped",
            self.rows_read,
            self.rows_used,
            self.row_errors.len()
        );
        if !self.missing.is_empty() {
            let codes: Vec<&str> = self.missing.iter().map(|i| i.code()).collect();
            out.push_str(&format!(" | missing indicators: {}", codes.join(", ")));
        }
        out
    }
}

/// Resolve the CSV path: explicit flag, else environment, else default.
pub fn resolve_data_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    dotenvy::dotenv().ok();
    std::env::var(DATA_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE))
}

/// Load the dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data_unavailable(format!("Failed to open dataset '{}': {e}", path.display()))
    })?;
    read_dataset(file)
}

/// Process-lifetime cached dataset.
///
/// The cache is keyed by nothing: the first successful (or failed) load wins
/// and later calls return the same result regardless of `path`. Invalidation
/// is a process restart, matching the one-shot lifecycle of the source file.
pub fn cached_dataset(path: &Path) -> Result<&'static Dataset, AppError> {
    static CACHE: OnceLock<Result<Dataset, AppError>> = OnceLock::new();
    match CACHE.get_or_init(|| load_dataset(path)) {
        Ok(dataset) => Ok(dataset),
        Err(err) => Err(err.clone()),
    }
}

/// Load the dataset from any reader (used directly by tests).
pub fn read_dataset(reader: impl std::io::Read) -> Result<Dataset, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::data_unavailable(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let period_column = resolve_period_column(&header_map)?;

    let mut available = Vec::new();
    let mut missing = Vec::new();
    for indicator in Indicator::ALL {
        if header_map.contains_key(indicator.code()) {
            available.push(indicator);
        } else {
            missing.push(indicator);
        }
    }
    if available.is_empty() {
        return Err(AppError::data_unavailable(
            "No catalog indicator columns found in the dataset header.",
        ));
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    period: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, period_column, &available) {
            Ok(row) => records.push(row),
            Err((period, message)) => row_errors.push(RowError {
                line,
                period,
                message,
            }),
        }
    }

    let rows_used = records.len();
    if rows_used == 0 {
        if !row_errors.is_empty() {
            return Err(AppError::malformed_period(format!(
                "All {rows_read} rows were dropped (first problem: line {}, {}).",
                row_errors[0].line, row_errors[0].message
            )));
        }
        return Err(AppError::data_unavailable("Dataset contains no rows."));
    }

    Ok(Dataset {
        records,
        available,
        missing,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿time_period"). If we don't strip it, column
    // resolution would incorrectly report a missing period column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Index of the column the period label comes from.
///
/// `time_period` (composite labels) is preferred; a plain `year` column is
/// accepted for already-annual files.
fn resolve_period_column(header_map: &HashMap<String, usize>) -> Result<usize, AppError> {
    if let Some(&idx) = header_map.get("time_period") {
        return Ok(idx);
    }
    if let Some(&idx) = header_map.get("year") {
        return Ok(idx);
    }
    Err(AppError::data_unavailable(
        "Dataset has neither a `time_period` nor a `year` column.",
    ))
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    period_column: usize,
    available: &[Indicator],
) -> Result<Record, (Option<String>, String)> {
    let period = record
        .get(period_column)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or((None, "Missing period value.".to_string()))?
        .to_string();

    let year = year_from_period(&period).map_err(|e| (Some(period.clone()), e))?;

    let mut row = Record::new(period, year);
    for &indicator in available {
        let value = get_optional(record, header_map, indicator.code()).and_then(parse_f64);
        row.set_value(indicator, value);
    }
    Ok(row)
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}TIME_PERIOD,NY.GDP.MKTP.CD,SP.DYN.LE00.IN,SP.POP.GROW\n\
        1970-Q1,100.0,64.1,1.9\n\
        1970-Q2,110.0,,1.8\n\
        1971-Q1,120.0,64.5,not-a-number\n\
        garbage,1.0,2.0,3.0\n";

    #[test]
    fn loads_and_normalizes_headers() {
        let ds = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.rows_read, 4);
        assert_eq!(ds.rows_used, 3);
        assert_eq!(ds.row_errors.len(), 1);
        assert!(ds.is_available(Indicator::Gdp));
        assert!(ds.missing.contains(&Indicator::FertilityRate));
    }

    #[test]
    fn malformed_period_rows_are_dropped_with_context() {
        let ds = read_dataset(SAMPLE.as_bytes()).unwrap();
        let err = &ds.row_errors[0];
        assert_eq!(err.line, 5);
        assert_eq!(err.period.as_deref(), Some("garbage"));
    }

    #[test]
    fn empty_cells_and_bad_numbers_become_missing() {
        let ds = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.records[1].value(Indicator::LifeExpectancy), None);
        assert_eq!(ds.records[2].value(Indicator::PopulationGrowth), None);
        assert_eq!(ds.records[0].value(Indicator::Gdp), Some(100.0));
    }

    #[test]
    fn year_bounds_cover_all_records() {
        let ds = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.year_bounds(), Some(YearRange::new(1970, 1971)));
    }

    #[test]
    fn no_period_column_is_fatal() {
        let err = read_dataset("a,b\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn all_rows_malformed_is_fatal() {
        let csv = "time_period,ny.gdp.mktp.cd\nQ1,1.0\nQ2,2.0\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn year_column_accepted_for_annual_files() {
        let csv = "year,sp.pop.grow\n2018,1.1\n2019,1.0\n";
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].year, 2018);
        assert_eq!(ds.records[1].year, 2019);
    }
}
