//! Per-source correction and its collection call shapes.
//!
//! Every entry point funnels into [`correct_source`], so a batch call and the
//! equivalent sequence of single-source calls agree bit for bit.

use ndarray::{Array, ArrayView, Dimension, Zip};
use rayon::prelude::*;

use crate::correction::calibration::{
    BRIGHT, FAINT, G_BRIGHT_FAINT_SPLIT, G_BRIGHT_LIMIT, clip_color,
};
use crate::domain::{
    AstrometricSolution, CorrectedColumns, CorrectedPhotometry, ParallelPolicy, Regime,
    SourceRecord,
};
use crate::error::{CorrectionError, InputColumn};

/// Decide which branch a source goes through.
///
/// Exclusion reasons are checked in a fixed order: solution type, colour,
/// then magnitude. A NaN magnitude fails every threshold comparison and is
/// reported as `MissingMagnitude`.
pub fn classify(record: &SourceRecord) -> Regime {
    if record.solution() != AstrometricSolution::SixParameter {
        return Regime::NotSixParameter;
    }
    match record.bp_rp {
        None => return Regime::MissingColor,
        Some(c) if c.is_nan() => return Regime::MissingColor,
        Some(_) => {}
    }

    let g = record.phot_g_mean_mag;
    if g.is_nan() {
        Regime::MissingMagnitude
    } else if g <= G_BRIGHT_LIMIT {
        Regime::TooBright
    } else if g <= G_BRIGHT_FAINT_SPLIT {
        Regime::Bright
    } else {
        Regime::Faint
    }
}

/// Multiplicative flux factor for a classified source.
pub fn correction_factor(regime: Regime, bp_rp: Option<f64>) -> f64 {
    let cubic = match regime {
        Regime::Bright => BRIGHT,
        Regime::Faint => FAINT,
        _ => return 1.0,
    };
    match bp_rp {
        Some(c) => cubic.eval(clip_color(c)),
        None => 1.0,
    }
}

/// Correct a single source.
pub fn correct_source(record: &SourceRecord) -> CorrectedPhotometry {
    let regime = classify(record);
    let factor = correction_factor(regime, record.bp_rp);

    // log10(1) == 0, so excluded sources come back unchanged (NaN included).
    CorrectedPhotometry {
        phot_g_mean_mag: record.phot_g_mean_mag - 2.5 * factor.log10(),
        phot_g_mean_flux: record.phot_g_mean_flux * factor,
        factor,
        regime,
    }
}

/// Scalar convenience: raw values in, `(corrected_mag, corrected_flux)` out.
///
/// A NaN `bp_rp` is treated as a missing colour.
pub fn correct_scalar(
    bp_rp: f64,
    astrometric_params_solved: i64,
    phot_g_mean_mag: f64,
    phot_g_mean_flux: f64,
) -> (f64, f64) {
    let out = correct_source(&SourceRecord::from_raw(
        bp_rp,
        astrometric_params_solved,
        phot_g_mean_mag,
        phot_g_mean_flux,
    ));
    (out.phot_g_mean_mag, out.phot_g_mean_flux)
}

/// Correct an ordered collection of sources, preserving order.
pub fn correct_sources(records: &[SourceRecord]) -> Vec<CorrectedPhotometry> {
    correct_sources_with(records, ParallelPolicy::SEQUENTIAL)
}

/// Like [`correct_sources`], switching to rayon for large inputs.
pub fn correct_sources_with(
    records: &[SourceRecord],
    policy: ParallelPolicy,
) -> Vec<CorrectedPhotometry> {
    if policy.use_parallel(records.len()) {
        records.par_iter().map(correct_source).collect()
    } else {
        records.iter().map(correct_source).collect()
    }
}

/// Correct four parallel columns.
///
/// Fails before touching any value if the column lengths disagree.
pub fn correct_columns(
    bp_rp: &[f64],
    astrometric_params_solved: &[i64],
    phot_g_mean_mag: &[f64],
    phot_g_mean_flux: &[f64],
) -> Result<CorrectedColumns, CorrectionError> {
    correct_columns_with(
        bp_rp,
        astrometric_params_solved,
        phot_g_mean_mag,
        phot_g_mean_flux,
        ParallelPolicy::SEQUENTIAL,
    )
}

/// Like [`correct_columns`], switching to rayon for large inputs.
pub fn correct_columns_with(
    bp_rp: &[f64],
    astrometric_params_solved: &[i64],
    phot_g_mean_mag: &[f64],
    phot_g_mean_flux: &[f64],
    policy: ParallelPolicy,
) -> Result<CorrectedColumns, CorrectionError> {
    ensure_same_shape([
        (InputColumn::Color, &[bp_rp.len()][..]),
        (InputColumn::Solution, &[astrometric_params_solved.len()][..]),
        (InputColumn::Magnitude, &[phot_g_mean_mag.len()][..]),
        (InputColumn::Flux, &[phot_g_mean_flux.len()][..]),
    ])?;

    let one = |(((&c, &s), &m), &f): (((&f64, &i64), &f64), &f64)| {
        let out = correct_source(&SourceRecord::from_raw(c, s, m, f));
        (out.phot_g_mean_mag, out.phot_g_mean_flux)
    };

    let (mag, flux): (Vec<f64>, Vec<f64>) = if policy.use_parallel(bp_rp.len()) {
        bp_rp
            .par_iter()
            .zip(astrometric_params_solved.par_iter())
            .zip(phot_g_mean_mag.par_iter())
            .zip(phot_g_mean_flux.par_iter())
            .map(one)
            .unzip()
    } else {
        bp_rp
            .iter()
            .zip(astrometric_params_solved.iter())
            .zip(phot_g_mean_mag.iter())
            .zip(phot_g_mean_flux.iter())
            .map(one)
            .unzip()
    };

    Ok(CorrectedColumns {
        phot_g_mean_mag: mag,
        phot_g_mean_flux: flux,
    })
}

/// Correct four arrays of identical shape and any dimensionality.
///
/// A 0-dimensional array is the scalar case; its shape check is trivial.
pub fn correct_arrays<D: Dimension>(
    bp_rp: ArrayView<'_, f64, D>,
    astrometric_params_solved: ArrayView<'_, i64, D>,
    phot_g_mean_mag: ArrayView<'_, f64, D>,
    phot_g_mean_flux: ArrayView<'_, f64, D>,
) -> Result<(Array<f64, D>, Array<f64, D>), CorrectionError> {
    ensure_same_shape([
        (InputColumn::Color, bp_rp.shape()),
        (InputColumn::Solution, astrometric_params_solved.shape()),
        (InputColumn::Magnitude, phot_g_mean_mag.shape()),
        (InputColumn::Flux, phot_g_mean_flux.shape()),
    ])?;

    let corrected = Zip::from(&bp_rp)
        .and(&astrometric_params_solved)
        .and(&phot_g_mean_mag)
        .and(&phot_g_mean_flux)
        .map_collect(|&c, &s, &m, &f| correct_source(&SourceRecord::from_raw(c, s, m, f)));

    let mag = corrected.map(|p| p.phot_g_mean_mag);
    let flux = corrected.map(|p| p.phot_g_mean_flux);
    Ok((mag, flux))
}

/// Check that all four inputs share one shape.
///
/// The reference shape is the one shared by the most inputs (ties go to the
/// earliest); the error names the first input that differs from it.
fn ensure_same_shape(shapes: [(InputColumn, &[usize]); 4]) -> Result<(), CorrectionError> {
    let mut reference = 0;
    let mut best_count = 0;
    for (i, (_, shape)) in shapes.iter().enumerate() {
        let count = shapes.iter().filter(|(_, other)| other == shape).count();
        if count > best_count {
            best_count = count;
            reference = i;
        }
    }

    let (ref_column, ref_shape) = shapes[reference];
    for (column, shape) in shapes {
        if shape != ref_shape {
            return Err(CorrectionError::ShapeMismatch {
                reference: ref_column,
                expected: ref_shape.to_vec(),
                column,
                found: shape.to_vec(),
            });
        }
    }
    Ok(())
}
