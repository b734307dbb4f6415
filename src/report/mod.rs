//! Reporting utilities: run summaries and formatted terminal output.
//!
//! Formatting lives here so the engine and ingest code stay free of
//! presentation concerns.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::correction::{CalibrationInfo, calibration_info};
use crate::domain::{CorrectedPhotometry, Regime};
use crate::io::ingest::IngestedData;

pub mod format;

pub use format::*;

/// Number of sources that went through each branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegimeCounts {
    pub bright: usize,
    pub faint: usize,
    pub not_six_parameter: usize,
    pub missing_color: usize,
    pub too_bright: usize,
    pub missing_magnitude: usize,
}

impl RegimeCounts {
    pub fn add(&mut self, regime: Regime) {
        let slot = match regime {
            Regime::Bright => &mut self.bright,
            Regime::Faint => &mut self.faint,
            Regime::NotSixParameter => &mut self.not_six_parameter,
            Regime::MissingColor => &mut self.missing_color,
            Regime::TooBright => &mut self.too_bright,
            Regime::MissingMagnitude => &mut self.missing_magnitude,
        };
        *slot += 1;
    }

    pub fn get(&self, regime: Regime) -> usize {
        match regime {
            Regime::Bright => self.bright,
            Regime::Faint => self.faint,
            Regime::NotSixParameter => self.not_six_parameter,
            Regime::MissingColor => self.missing_color,
            Regime::TooBright => self.too_bright,
            Regime::MissingMagnitude => self.missing_magnitude,
        }
    }

    pub fn corrected(&self) -> usize {
        self.bright + self.faint
    }

    pub fn total(&self) -> usize {
        Regime::ALL.iter().map(|&r| self.get(r)).sum()
    }
}

/// Everything worth recording about one `gcorr correct` run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub generated: DateTime<Local>,
    pub input: String,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_skipped: usize,
    pub regimes: RegimeCounts,
    /// Smallest/largest factor applied to a corrected source.
    pub factor_min: Option<f64>,
    pub factor_max: Option<f64>,
    pub calibration: CalibrationInfo,
}

/// Tally regimes and the factor range over a finished run.
pub fn summarize(
    input: &Path,
    ingest: &IngestedData,
    corrected: &[CorrectedPhotometry],
) -> RunSummary {
    let mut regimes = RegimeCounts::default();
    let mut factor_min: Option<f64> = None;
    let mut factor_max: Option<f64> = None;

    for c in corrected {
        regimes.add(c.regime);
        if c.regime.is_corrected() {
            factor_min = Some(factor_min.map_or(c.factor, |m| m.min(c.factor)));
            factor_max = Some(factor_max.map_or(c.factor, |m| m.max(c.factor)));
        }
    }

    RunSummary {
        tool: "gcorr".to_string(),
        generated: Local::now(),
        input: input.display().to_string(),
        rows_read: ingest.rows_read,
        rows_used: ingest.rows_used,
        rows_skipped: ingest.row_errors.len(),
        regimes,
        factor_min,
        factor_max,
        calibration: calibration_info(),
    }
}
