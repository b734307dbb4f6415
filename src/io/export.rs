//! Export corrected photometry to CSV and the run summary to JSON.
//!
//! The CSV keeps the four input columns next to the corrected ones so the
//! file can be diffed or joined back onto the source table downstream.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::CorrectedPhotometry;
use crate::error::AppError;
use crate::io::ingest::IngestedSource;
use crate::report::RunSummary;

#[derive(Debug, Serialize)]
struct ExportRow {
    bp_rp: Option<f64>,
    astrometric_params_solved: i64,
    phot_g_mean_mag: f64,
    phot_g_mean_flux: f64,
    regime: &'static str,
    correction_factor: f64,
    phot_g_mean_mag_corrected: f64,
    phot_g_mean_flux_corrected: f64,
}

/// `ExportRow` with the identifier column in front.
#[derive(Debug, Serialize)]
struct IdentifiedExportRow<'a> {
    source_id: &'a str,
    bp_rp: Option<f64>,
    astrometric_params_solved: i64,
    phot_g_mean_mag: f64,
    phot_g_mean_flux: f64,
    regime: &'static str,
    correction_factor: f64,
    phot_g_mean_mag_corrected: f64,
    phot_g_mean_flux_corrected: f64,
}

impl ExportRow {
    fn new(src: &IngestedSource, fixed: &CorrectedPhotometry) -> Self {
        let r = &src.record;
        Self {
            bp_rp: r.bp_rp,
            astrometric_params_solved: r.astrometric_params_solved,
            phot_g_mean_mag: r.phot_g_mean_mag,
            phot_g_mean_flux: r.phot_g_mean_flux,
            regime: fixed.regime.label(),
            correction_factor: fixed.factor,
            phot_g_mean_mag_corrected: fixed.phot_g_mean_mag,
            phot_g_mean_flux_corrected: fixed.phot_g_mean_flux,
        }
    }

    fn with_id(self, source_id: &str) -> IdentifiedExportRow<'_> {
        IdentifiedExportRow {
            source_id,
            bp_rp: self.bp_rp,
            astrometric_params_solved: self.astrometric_params_solved,
            phot_g_mean_mag: self.phot_g_mean_mag,
            phot_g_mean_flux: self.phot_g_mean_flux,
            regime: self.regime,
            correction_factor: self.correction_factor,
            phot_g_mean_mag_corrected: self.phot_g_mean_mag_corrected,
            phot_g_mean_flux_corrected: self.phot_g_mean_flux_corrected,
        }
    }
}

/// Write corrected rows as CSV to any writer.
///
/// `sources` and `corrected` must be index-aligned (same order, same length).
/// The `source_id` column is written only when `include_source_id` is set,
/// i.e. when the input table had one.
pub fn write_corrected_csv<W: Write>(
    out: W,
    sources: &[IngestedSource],
    corrected: &[CorrectedPhotometry],
    include_source_id: bool,
) -> Result<(), AppError> {
    if sources.len() != corrected.len() {
        return Err(AppError::new(
            5,
            format!(
                "Internal error: {} sources but {} corrected rows.",
                sources.len(),
                corrected.len()
            ),
        ));
    }

    let mut writer = csv::Writer::from_writer(out);
    for (src, fixed) in sources.iter().zip(corrected) {
        let row = ExportRow::new(src, fixed);
        let written = if include_source_id {
            writer.serialize(row.with_id(src.source_id.as_deref().unwrap_or("")))
        } else {
            writer.serialize(row)
        };
        written.map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write corrected rows to a CSV file.
pub fn write_corrected_csv_file(
    path: &Path,
    sources: &[IngestedSource],
    corrected: &[CorrectedPhotometry],
    include_source_id: bool,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_corrected_csv(file, sources, corrected, include_source_id)
}

/// Write the run summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
