//! The `gcorr correct` workflow, independent of where its output goes.
//!
//! ingest -> correct -> summarize
//!
//! The CLI layer only decides where to print or write the results.

use tracing::info;

use crate::correction::correct_sources_with;
use crate::domain::{CorrectedPhotometry, CorrectionConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_sources};
use crate::report::{RunSummary, summarize};

/// All computed outputs of a single `gcorr correct` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    /// Index-aligned with `ingest.sources`.
    pub corrected: Vec<CorrectedPhotometry>,
    pub summary: RunSummary,
}

/// Execute the full correction pipeline and return the computed outputs.
pub fn run_correction(config: &CorrectionConfig) -> Result<RunOutput, AppError> {
    // 1) Read the table.
    let ingest = load_sources(&config.input, &config.columns)?;
    info!(
        rows_read = ingest.rows_read,
        rows_used = ingest.rows_used,
        skipped = ingest.row_errors.len(),
        "ingested {}",
        config.input.display()
    );

    // 2) Correct every source.
    let records = ingest.records();
    let parallel = config.parallel.use_parallel(records.len());
    info!(n = records.len(), parallel, "correcting sources");
    let corrected = correct_sources_with(&records, config.parallel);

    // 3) Summarize.
    let summary = summarize(&config.input, &ingest, &corrected);
    info!(
        corrected = summary.regimes.corrected(),
        bright = summary.regimes.bright,
        faint = summary.regimes.faint,
        "correction done"
    );

    Ok(RunOutput {
        ingest,
        corrected,
        summary,
    })
}
