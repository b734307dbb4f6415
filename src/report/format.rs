//! Plain-text rendering of run summaries and single-source results.

use crate::domain::{CorrectedPhotometry, Regime, SourceRecord};
use crate::report::RunSummary;

/// Format the run summary (row counts, branch counts, factor range).
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== gcorr - G-band correction for 6-parameter solutions ===\n");
    out.push_str(&format!("Input: {}\n", summary.input));
    out.push_str(&format!(
        "Rows: read={} | used={} | skipped={}\n",
        summary.rows_read, summary.rows_used, summary.rows_skipped
    ));

    let regimes = &summary.regimes;
    out.push_str(&format!(
        "Corrected: {} of {} ({:.1}%)\n",
        regimes.corrected(),
        regimes.total(),
        percent(regimes.corrected(), regimes.total()),
    ));

    out.push_str("\nBranches:\n");
    for regime in Regime::ALL {
        out.push_str(&format!("  {:<18} {:>10}\n", regime.label(), regimes.get(regime)));
    }

    match (summary.factor_min, summary.factor_max) {
        (Some(lo), Some(hi)) => {
            out.push_str(&format!(
                "\nFactor range: [{lo:.6}, {hi:.6}] | dG range: [{:+.5}, {:+.5}] mag\n",
                delta_mag(hi),
                delta_mag(lo),
            ));
        }
        _ => out.push_str("\nFactor range: n/a (no source corrected)\n"),
    }

    out
}

/// Format a single corrected source (used by `gcorr factor`).
pub fn format_single(record: &SourceRecord, result: &CorrectedPhotometry) -> String {
    let color = record
        .bp_rp
        .map(|c| format!("{c:.4}"))
        .unwrap_or_else(|| "missing".to_string());

    let mut out = String::new();
    out.push_str(&format!(
        "bp_rp={color} | solved={} | G={:.6} | flux={}\n",
        record.astrometric_params_solved, record.phot_g_mean_mag, record.phot_g_mean_flux
    ));
    out.push_str(&format!("regime: {}\n", result.regime.label()));
    out.push_str(&format!("factor: {:.10}\n", result.factor));
    out.push_str(&format!(
        "G_corrected: {:.6} ({:+.6})\n",
        result.phot_g_mean_mag,
        result.phot_g_mean_mag - record.phot_g_mean_mag
    ));
    out.push_str(&format!("flux_corrected: {}\n", result.phot_g_mean_flux));
    out
}

fn delta_mag(factor: f64) -> f64 {
    -2.5 * factor.log10()
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
