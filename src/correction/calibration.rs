//! Calibration constants for the 6-parameter G-band correction.
//!
//! The correction factor is a cubic in clipped `bp_rp` colour:
//!
//! ```text
//! factor(c) = a0 + a1*c + a2*c^2 + a3*c^3,   c = clamp(bp_rp, 0.25, 3.0)
//! ```
//!
//! with one coefficient set for `13 < G <= 16` and another for `G > 16`.
//! The coefficients are empirical and must stay exactly as written.

use serde::Serialize;

/// Sources at or brighter than this G magnitude are never corrected.
pub const G_BRIGHT_LIMIT: f64 = 13.0;

/// Upper (inclusive) edge of the bright regime.
pub const G_BRIGHT_FAINT_SPLIT: f64 = 16.0;

/// Colour clip bounds; keeps the cubic from extrapolating.
pub const BP_RP_MIN: f64 = 0.25;
pub const BP_RP_MAX: f64 = 3.0;

/// Cubic polynomial coefficients, lowest order first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cubic {
    pub coeffs: [f64; 4],
}

impl Cubic {
    /// Evaluate the polynomial at `c` (no clipping here).
    pub fn eval(&self, c: f64) -> f64 {
        let [a0, a1, a2, a3] = self.coeffs;
        a0 + a1 * c + a2 * (c * c) + a3 * (c * c * c)
    }
}

/// `G > 16`.
pub const FAINT: Cubic = Cubic {
    coeffs: [1.00525, -0.02323, 0.01740, -0.00253],
};

/// `13 < G <= 16`.
pub const BRIGHT: Cubic = Cubic {
    coeffs: [1.00876, -0.02540, 0.01747, -0.00277],
};

/// Clamp a colour into `[BP_RP_MIN, BP_RP_MAX]`.
///
/// NaN stays NaN (`f64::clamp` only panics on bad bounds).
pub fn clip_color(bp_rp: f64) -> f64 {
    bp_rp.clamp(BP_RP_MIN, BP_RP_MAX)
}

/// Snapshot of every constant above, for run summaries.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationInfo {
    pub six_parameter_code: i64,
    pub g_bright_limit: f64,
    pub g_bright_faint_split: f64,
    pub bp_rp_min: f64,
    pub bp_rp_max: f64,
    pub bright: Cubic,
    pub faint: Cubic,
}

pub fn calibration_info() -> CalibrationInfo {
    CalibrationInfo {
        six_parameter_code: crate::domain::SIX_PARAMETER_SOLUTION,
        g_bright_limit: G_BRIGHT_LIMIT,
        g_bright_faint_split: G_BRIGHT_FAINT_SPLIT,
        bp_rp_min: BP_RP_MIN,
        bp_rp_max: BP_RP_MAX,
        bright: BRIGHT,
        faint: FAINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn clip_color_bounds_and_nan() {
        assert_eq!(clip_color(-1.0), 0.25);
        assert_eq!(clip_color(0.25), 0.25);
        assert_eq!(clip_color(1.7), 1.7);
        assert_eq!(clip_color(3.0), 3.0);
        assert_eq!(clip_color(7.5), 3.0);
        assert!(clip_color(f64::NAN).is_nan());
    }

    #[test]
    fn faint_cubic_matches_expanded_form() {
        let c = 1.5;
        let expected = 1.00525 - 0.02323 * c + 0.01740 * c * c - 0.00253 * c * c * c;
        assert_abs_diff_eq!(FAINT.eval(c), expected, epsilon = 1e-15);
        assert_abs_diff_eq!(FAINT.eval(c), 1.00101625, epsilon = 1e-12);
    }

    #[test]
    fn bright_cubic_matches_expanded_form() {
        for &c in &[0.25, 1.0, 2.2, 3.0] {
            let expected = 1.00876 - 0.02540 * c + 0.01747 * c * c - 0.00277 * c * c * c;
            assert_abs_diff_eq!(BRIGHT.eval(c), expected, epsilon = 1e-15);
        }
    }

    #[test]
    fn factors_stay_close_to_unity_over_clip_range() {
        for i in 0..=100 {
            let c = BP_RP_MIN + (BP_RP_MAX - BP_RP_MIN) * i as f64 / 100.0;
            for cubic in [BRIGHT, FAINT] {
                let f = cubic.eval(c);
                assert!(f > 0.95 && f < 1.05, "factor {f} at c={c}");
            }
        }
    }
}
