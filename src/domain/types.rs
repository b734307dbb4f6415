//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built from ingested table rows or from raw columns
//! - passed through the correction engine without copying large buffers
//! - exported to CSV/JSON next to the corrected photometry

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// `astrometric_params_solved` value of a 6-parameter astrometric solution.
pub const SIX_PARAMETER_SOLUTION: i64 = 95;

/// Classification of the `astrometric_params_solved` code.
///
/// Only the exact code `95` selects the correction; any other code (2, 3, 31,
/// or something unexpected) leaves the source untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AstrometricSolution {
    SixParameter,
    Other(i64),
}

impl AstrometricSolution {
    pub fn from_code(code: i64) -> Self {
        if code == SIX_PARAMETER_SOLUTION {
            AstrometricSolution::SixParameter
        } else {
            AstrometricSolution::Other(code)
        }
    }

    pub fn code(self) -> i64 {
        match self {
            AstrometricSolution::SixParameter => SIX_PARAMETER_SOLUTION,
            AstrometricSolution::Other(code) => code,
        }
    }
}

/// One source as seen by the correction engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// `bp_rp` colour index. `None` when the catalogue has no colour.
    pub bp_rp: Option<f64>,
    pub astrometric_params_solved: i64,
    pub phot_g_mean_mag: f64,
    pub phot_g_mean_flux: f64,
}

impl SourceRecord {
    pub fn new(
        bp_rp: Option<f64>,
        astrometric_params_solved: i64,
        phot_g_mean_mag: f64,
        phot_g_mean_flux: f64,
    ) -> Self {
        Self {
            bp_rp,
            astrometric_params_solved,
            phot_g_mean_mag,
            phot_g_mean_flux,
        }
    }

    /// Build a record from raw column values, where a NaN colour means "missing".
    ///
    /// Magnitude and flux are kept as given so NaN propagates to the outputs.
    pub fn from_raw(
        bp_rp: f64,
        astrometric_params_solved: i64,
        phot_g_mean_mag: f64,
        phot_g_mean_flux: f64,
    ) -> Self {
        let bp_rp = if bp_rp.is_nan() { None } else { Some(bp_rp) };
        Self::new(bp_rp, astrometric_params_solved, phot_g_mean_mag, phot_g_mean_flux)
    }

    pub fn solution(&self) -> AstrometricSolution {
        AstrometricSolution::from_code(self.astrometric_params_solved)
    }
}

/// Which branch of the correction a source went through.
///
/// `Bright` and `Faint` are corrected; every other variant is an exclusion
/// reason and implies a correction factor of exactly 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// `13 < G <= 16`.
    Bright,
    /// `G > 16`.
    Faint,
    /// Solution code is not the 6-parameter one.
    NotSixParameter,
    MissingColor,
    /// `G <= 13`.
    TooBright,
    /// Magnitude is NaN; nothing to compare against the thresholds.
    MissingMagnitude,
}

impl Regime {
    pub const ALL: [Regime; 6] = [
        Regime::Bright,
        Regime::Faint,
        Regime::NotSixParameter,
        Regime::MissingColor,
        Regime::TooBright,
        Regime::MissingMagnitude,
    ];

    pub fn is_corrected(self) -> bool {
        matches!(self, Regime::Bright | Regime::Faint)
    }

    pub fn label(self) -> &'static str {
        match self {
            Regime::Bright => "bright",
            Regime::Faint => "faint",
            Regime::NotSixParameter => "not_six_parameter",
            Regime::MissingColor => "missing_color",
            Regime::TooBright => "too_bright",
            Regime::MissingMagnitude => "missing_magnitude",
        }
    }
}

/// Corrected G-band photometry for one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectedPhotometry {
    pub phot_g_mean_mag: f64,
    pub phot_g_mean_flux: f64,
    /// Multiplicative flux factor that was applied (exactly 1 when excluded).
    pub factor: f64,
    pub regime: Regime,
}

/// Two output columns with the same length as the inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrectedColumns {
    pub phot_g_mean_mag: Vec<f64>,
    pub phot_g_mean_flux: Vec<f64>,
}

impl CorrectedColumns {
    pub fn len(&self) -> usize {
        self.phot_g_mean_mag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phot_g_mean_mag.is_empty()
    }
}

/// When to switch the column call shape over to rayon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelPolicy {
    /// Inputs with at least this many elements are corrected in parallel.
    pub min_parallel_len: usize,
}

impl ParallelPolicy {
    pub const SEQUENTIAL: ParallelPolicy = ParallelPolicy {
        min_parallel_len: usize::MAX,
    };

    pub fn use_parallel(&self, len: usize) -> bool {
        len >= self.min_parallel_len
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            min_parallel_len: 100_000,
        }
    }
}

/// Table column names for the four inputs (plus the optional identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub source_id: String,
    pub bp_rp: String,
    pub astrometric_params_solved: String,
    pub phot_g_mean_mag: String,
    pub phot_g_mean_flux: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            source_id: "source_id".to_string(),
            bp_rp: "bp_rp".to_string(),
            astrometric_params_solved: "astrometric_params_solved".to_string(),
            phot_g_mean_mag: "phot_g_mean_mag".to_string(),
            phot_g_mean_flux: "phot_g_mean_flux".to_string(),
        }
    }
}

/// Fully resolved settings for one `gcorr correct` run.
#[derive(Debug, Clone)]
pub struct CorrectionConfig {
    pub input: PathBuf,
    /// `None` writes the corrected table to stdout.
    pub output: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub columns: ColumnNames,
    pub parallel: ParallelPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_maps_nan_color_to_missing() {
        let rec = SourceRecord::from_raw(f64::NAN, 95, 17.0, 1000.0);
        assert_eq!(rec.bp_rp, None);

        let rec = SourceRecord::from_raw(1.2, 95, f64::NAN, 1000.0);
        assert_eq!(rec.bp_rp, Some(1.2));
        assert!(rec.phot_g_mean_mag.is_nan());
    }

    #[test]
    fn solution_code_round_trips() {
        assert_eq!(AstrometricSolution::from_code(95), AstrometricSolution::SixParameter);
        assert_eq!(AstrometricSolution::from_code(31), AstrometricSolution::Other(31));
        assert_eq!(AstrometricSolution::Other(3).code(), 3);
        assert_eq!(AstrometricSolution::SixParameter.code(), 95);
    }

    #[test]
    fn sequential_policy_never_parallelizes() {
        assert!(!ParallelPolicy::SEQUENTIAL.use_parallel(10_000_000));
        assert!(ParallelPolicy { min_parallel_len: 4 }.use_parallel(4));
    }
}
