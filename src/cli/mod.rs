//! Command-line parsing for the G-band correction tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! correction code. Every option can also come from a `GCORR_*` environment
//! variable (a `.env` file in the working directory is loaded first).

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "gcorr",
    version,
    about = "G-band magnitude/flux correction for 6-parameter astrometric solutions"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Correct every row of a CSV table and write the corrected table.
    Correct(CorrectArgs),
    /// Correct a single source given on the command line.
    Factor(FactorArgs),
}

/// Options for correcting a table.
#[derive(Debug, Args, Clone)]
pub struct CorrectArgs {
    /// Input CSV with a header row.
    #[arg(short, long, env = "GCORR_INPUT", value_name = "CSV")]
    pub input: PathBuf,

    /// Output CSV (defaults to stdout).
    #[arg(short, long, env = "GCORR_OUTPUT", value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Write a JSON run summary.
    #[arg(long, env = "GCORR_SUMMARY", value_name = "JSON")]
    pub summary: Option<PathBuf>,

    /// Correct in parallel once the table has at least this many rows.
    #[arg(long, env = "GCORR_PARALLEL_MIN", default_value_t = 100_000)]
    pub parallel_min: usize,

    /// Identifier column carried through to the output (optional in the input).
    #[arg(long, env = "GCORR_COL_SOURCE_ID", default_value = "source_id")]
    pub col_source_id: String,

    /// Colour index column.
    #[arg(long, env = "GCORR_COL_BP_RP", default_value = "bp_rp")]
    pub col_bp_rp: String,

    /// Astrometric solution code column.
    #[arg(long, env = "GCORR_COL_SOLVED", default_value = "astrometric_params_solved")]
    pub col_solved: String,

    /// G-band magnitude column.
    #[arg(long, env = "GCORR_COL_MAG", default_value = "phot_g_mean_mag")]
    pub col_mag: String,

    /// G-band flux column.
    #[arg(long, env = "GCORR_COL_FLUX", default_value = "phot_g_mean_flux")]
    pub col_flux: String,
}

/// Options for correcting one source.
#[derive(Debug, Args, Clone)]
pub struct FactorArgs {
    /// `bp_rp` colour; omit (or pass NaN) for a source without colour.
    #[arg(long, allow_hyphen_values = true)]
    pub bp_rp: Option<f64>,

    /// `astrometric_params_solved` code (95 = 6-parameter).
    #[arg(long, default_value_t = 95)]
    pub solved: i64,

    /// G-band magnitude.
    #[arg(long, allow_hyphen_values = true)]
    pub mag: f64,

    /// G-band flux. Defaults to 1 so the corrected flux reads as the factor.
    #[arg(long, default_value_t = 1.0)]
    pub flux: f64,
}
