use approx::assert_abs_diff_eq;
use gaia_gcorr::correction::{
    correct_arrays, correct_columns, correct_scalar, correct_source, correct_sources,
};
use gaia_gcorr::domain::{Regime, SourceRecord};
use gaia_gcorr::error::{CorrectionError, InputColumn};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_columns(n: usize, seed: u64) -> (Vec<f64>, Vec<i64>, Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bp_rp = Vec::with_capacity(n);
    let mut solved = Vec::with_capacity(n);
    let mut mag = Vec::with_capacity(n);
    let mut flux = Vec::with_capacity(n);

    for _ in 0..n {
        bp_rp.push(if rng.gen_bool(0.1) { f64::NAN } else { rng.gen_range(-1.0..5.0) });
        solved.push(*[2_i64, 3, 31, 95, 95, 95].get(rng.gen_range(0..6)).unwrap());
        mag.push(if rng.gen_bool(0.05) { f64::NAN } else { rng.gen_range(5.0..22.0) });
        flux.push(rng.gen_range(1.0..1e6));
    }
    (bp_rp, solved, mag, flux)
}

#[test]
fn vector_call_equals_scalar_calls() {
    let (bp_rp, solved, mag, flux) = random_columns(2_000, 7);
    let cols = correct_columns(&bp_rp, &solved, &mag, &flux).unwrap();

    for i in 0..bp_rp.len() {
        let (m, f) = correct_scalar(bp_rp[i], solved[i], mag[i], flux[i]);
        assert_eq!(cols.phot_g_mean_mag[i].to_bits(), m.to_bits(), "mag at {i}");
        assert_eq!(cols.phot_g_mean_flux[i].to_bits(), f.to_bits(), "flux at {i}");
    }
}

#[test]
fn record_collection_equals_single_records() {
    let (bp_rp, solved, mag, flux) = random_columns(500, 11);
    let records: Vec<SourceRecord> = (0..bp_rp.len())
        .map(|i| SourceRecord::from_raw(bp_rp[i], solved[i], mag[i], flux[i]))
        .collect();

    let batch = correct_sources(&records);
    assert_eq!(batch.len(), records.len());
    for (r, b) in records.iter().zip(&batch) {
        let single = correct_source(r);
        assert_eq!(single.regime, b.regime);
        assert_eq!(single.factor.to_bits(), b.factor.to_bits());
    }
}

#[test]
fn excluded_sources_are_identity() {
    let (bp_rp, solved, mag, flux) = random_columns(2_000, 3);
    let cols = correct_columns(&bp_rp, &solved, &mag, &flux).unwrap();

    for i in 0..bp_rp.len() {
        let excluded = solved[i] != 95 || bp_rp[i].is_nan() || !(mag[i] > 13.0);
        if excluded {
            assert_eq!(cols.phot_g_mean_mag[i].to_bits(), mag[i].to_bits());
            assert_eq!(cols.phot_g_mean_flux[i].to_bits(), flux[i].to_bits());
        } else {
            assert_ne!(cols.phot_g_mean_flux[i], flux[i]);
        }
    }
}

#[test]
fn magnitude_and_flux_stay_consistent() {
    // -2.5 log10(flux ratio) must equal the magnitude shift.
    let (bp_rp, solved, mag, flux) = random_columns(1_000, 5);
    let cols = correct_columns(&bp_rp, &solved, &mag, &flux).unwrap();
    for i in 0..bp_rp.len() {
        if mag[i].is_nan() {
            assert!(cols.phot_g_mean_mag[i].is_nan());
            continue;
        }
        let dm = cols.phot_g_mean_mag[i] - mag[i];
        let ratio = cols.phot_g_mean_flux[i] / flux[i];
        assert_abs_diff_eq!(dm, -2.5 * ratio.log10(), epsilon = 1e-9);
    }
}

#[test]
fn reference_scenarios() {
    let faint = correct_source(&SourceRecord::new(Some(1.5), 95, 17.0, 1000.0));
    assert_eq!(faint.regime, Regime::Faint);
    let expected = 1.00525 - 0.02323 * 1.5 + 0.01740 * 2.25 - 0.00253 * 3.375;
    assert_abs_diff_eq!(faint.factor, expected, epsilon = 1e-14);
    assert_abs_diff_eq!(faint.phot_g_mean_mag, 17.0 - 2.5 * expected.log10(), epsilon = 1e-12);
    assert_abs_diff_eq!(faint.phot_g_mean_flux, 1000.0 * expected, epsilon = 1e-9);

    let other = correct_source(&SourceRecord::new(Some(1.5), 31, 17.0, 1000.0));
    assert_eq!(other.phot_g_mean_mag, 17.0);
    assert_eq!(other.phot_g_mean_flux, 1000.0);
}

#[test]
fn regime_edges() {
    let at = |mag: f64| correct_source(&SourceRecord::new(Some(1.0), 95, mag, 1.0)).regime;
    let next_up = |x: f64| f64::from_bits(x.to_bits() + 1);

    assert_eq!(at(13.0), Regime::TooBright);
    assert_eq!(at(next_up(13.0)), Regime::Bright);
    assert_eq!(at(16.0), Regime::Bright);
    assert_eq!(at(next_up(16.0)), Regime::Faint);
}

#[test]
fn shape_mismatch_is_detected_at_every_position() {
    let good_f = [1.0, 2.0, 3.0];
    let good_i = [95_i64, 95, 95];
    let short_f = [1.0, 2.0];
    let short_i = [95_i64, 95];

    let cases: [(InputColumn, Result<_, CorrectionError>); 4] = [
        (InputColumn::Color, correct_columns(&short_f, &good_i, &good_f, &good_f)),
        (InputColumn::Solution, correct_columns(&good_f, &short_i, &good_f, &good_f)),
        (InputColumn::Magnitude, correct_columns(&good_f, &good_i, &short_f, &good_f)),
        (InputColumn::Flux, correct_columns(&good_f, &good_i, &good_f, &short_f)),
    ];

    for (position, result) in cases {
        match result {
            Err(CorrectionError::ShapeMismatch { column, expected, found, .. }) => {
                assert_eq!(column, position);
                assert_eq!(expected, vec![3]);
                assert_eq!(found, vec![2]);
            }
            Ok(_) => panic!("mismatch at {position} not detected"),
        }
    }
}

#[test]
fn two_dimensional_arrays_match_flat_columns() {
    let (bp_rp, solved, mag, flux) = random_columns(60, 13);
    let shape = (6, 10);
    let a_c = Array2::from_shape_vec(shape, bp_rp.clone()).unwrap();
    let a_s = Array2::from_shape_vec(shape, solved.clone()).unwrap();
    let a_m = Array2::from_shape_vec(shape, mag.clone()).unwrap();
    let a_f = Array2::from_shape_vec(shape, flux.clone()).unwrap();

    let (m2, f2) = correct_arrays(a_c.view(), a_s.view(), a_m.view(), a_f.view()).unwrap();
    let flat = correct_columns(&bp_rp, &solved, &mag, &flux).unwrap();

    for (i, (m, f)) in m2.iter().zip(f2.iter()).enumerate() {
        assert_eq!(m.to_bits(), flat.phot_g_mean_mag[i].to_bits());
        assert_eq!(f.to_bits(), flat.phot_g_mean_flux[i].to_bits());
    }
}
