//! CSV ingest and normalization.
//!
//! This module turns a source table (typically a Gaia archive export) into
//! `SourceRecord`s the correction engine can consume.
//!
//! Design goals:
//! - **Strict schema** for the four required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Missing values are data**: an empty colour is "no colour", an empty
//!   magnitude/flux is NaN and flows through untouched
//! - **Separation of concerns**: no correction logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{ColumnNames, SourceRecord};
use crate::error::AppError;

/// One ingested table row.
#[derive(Debug, Clone)]
pub struct IngestedSource {
    /// 1-based line number in the input file.
    pub line: usize,
    pub source_id: Option<String>,
    pub record: SourceRecord,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: parsed sources + row errors + counters.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub sources: Vec<IngestedSource>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Whether the table carried the configured identifier column.
    pub has_source_id: bool,
}

impl IngestedData {
    pub fn records(&self) -> Vec<SourceRecord> {
        self.sources.iter().map(|s| s.record).collect()
    }
}

/// Load a CSV file from disk.
pub fn load_sources(path: &Path, columns: &ColumnNames) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_sources(file, columns)
}

/// Parse sources from any CSV reader.
pub fn read_sources<R: Read>(input: R, columns: &ColumnNames) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let layout = ColumnLayout::resolve(&header_map, columns)?;
    debug!(?layout, "resolved input columns");

    let mut sources = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Physical 1-based line from the reader, so `#` comment lines count.
        // `idx + 2` (header + 1-based) is only a fallback.
        let fallback_line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line() as usize);
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line() as usize);

        let source_id = layout
            .source_id
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        match parse_row(&record, &layout, columns) {
            Ok(parsed) => sources.push(IngestedSource {
                line,
                source_id,
                record: parsed,
            }),
            Err(message) => row_errors.push(RowError {
                line,
                id: source_id,
                message,
            }),
        }
    }

    for err in &row_errors {
        let id = err.id.as_deref().unwrap_or("");
        warn!(line = err.line, id, "skipping row: {}", err.message);
    }

    let rows_used = sources.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows found in input table."));
    }

    Ok(IngestedData {
        sources,
        row_errors,
        rows_read,
        rows_used,
        has_source_id: layout.source_id.is_some(),
    })
}

/// Column indices resolved against the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    source_id: Option<usize>,
    bp_rp: usize,
    solved: usize,
    mag: usize,
    flux: usize,
}

impl ColumnLayout {
    fn resolve(
        header_map: &HashMap<String, usize>,
        columns: &ColumnNames,
    ) -> Result<Self, AppError> {
        let required = |name: &str| {
            header_map
                .get(&normalize_header_name(name))
                .copied()
                .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
        };

        Ok(Self {
            source_id: header_map.get(&normalize_header_name(&columns.source_id)).copied(),
            bp_rp: required(&columns.bp_rp)?,
            solved: required(&columns.astrometric_params_solved)?,
            mag: required(&columns.phot_g_mean_mag)?,
            flux: required(&columns.phot_g_mean_flux)?,
        })
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(
    record: &StringRecord,
    layout: &ColumnLayout,
    columns: &ColumnNames,
) -> Result<SourceRecord, String> {
    let bp_rp = parse_measurement(field(record, layout.bp_rp), &columns.bp_rp)?;
    let solved =
        parse_solution_code(field(record, layout.solved), &columns.astrometric_params_solved)?;
    let mag = parse_measurement(field(record, layout.mag), &columns.phot_g_mean_mag)?;
    let flux = parse_measurement(field(record, layout.flux), &columns.phot_g_mean_flux)?;

    Ok(SourceRecord::new(
        bp_rp,
        solved,
        mag.unwrap_or(f64::NAN),
        flux.unwrap_or(f64::NAN),
    ))
}

fn field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !is_missing_token(s))
}

/// Tokens that archive exports use for masked values.
fn is_missing_token(s: &str) -> bool {
    s.is_empty()
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
        || s.eq_ignore_ascii_case("none")
        || s == "--"
}

/// `None` for a masked value; error for text that is not a number.
fn parse_measurement(s: Option<&str>, name: &str) -> Result<Option<f64>, String> {
    let Some(s) = s else { return Ok(None) };
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    Ok(if v.is_nan() { None } else { Some(v) })
}

/// Solution codes are integers, but some tools write them as `95.0`.
fn parse_solution_code(s: Option<&str>, name: &str) -> Result<i64, String> {
    let s = s.ok_or_else(|| format!("Missing required value: `{name}`"))?;
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Ok(v as i64)
    } else {
        Err(format!("Invalid `{name}` value '{s}' (expected an integer code)."))
    }
}
