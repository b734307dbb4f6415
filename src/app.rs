//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - runs the correction pipeline or the single-source correction
//! - prints summaries and writes exports

use std::io::Write;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CorrectArgs, FactorArgs};
use crate::correction::correct_source;
use crate::domain::{ColumnNames, CorrectionConfig, ParallelPolicy, SourceRecord};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `gcorr` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Correct(args) => handle_correct(args),
        Command::Factor(args) => handle_factor(args),
    }
}

/// Logs go to stderr so a CSV written to stdout stays clean.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore the error if a subscriber is already installed (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_correct(args: CorrectArgs) -> Result<(), AppError> {
    let config = correction_config_from_args(&args);
    debug!(?config, "resolved configuration");

    let run = pipeline::run_correction(&config)?;
    let report = crate::report::format_run_summary(&run.summary);

    match &config.output {
        Some(path) => {
            crate::io::export::write_corrected_csv_file(
                path,
                &run.ingest.sources,
                &run.corrected,
                run.ingest.has_source_id,
            )?;
            println!("{report}");
            println!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            crate::io::export::write_corrected_csv(
                stdout.lock(),
                &run.ingest.sources,
                &run.corrected,
                run.ingest.has_source_id,
            )?;
            // The table owns stdout; the human-readable report goes next to the logs.
            let mut stderr = std::io::stderr();
            writeln!(stderr, "{report}")
                .map_err(|e| AppError::new(2, format!("Failed to write report: {e}")))?;
        }
    }

    if let Some(path) = &config.summary {
        crate::io::export::write_summary_json(path, &run.summary)?;
    }

    Ok(())
}

fn handle_factor(args: FactorArgs) -> Result<(), AppError> {
    let record = SourceRecord::new(
        args.bp_rp.filter(|c| !c.is_nan()),
        args.solved,
        args.mag,
        args.flux,
    );
    let result = correct_source(&record);
    print!("{}", crate::report::format_single(&record, &result));
    Ok(())
}

pub fn correction_config_from_args(args: &CorrectArgs) -> CorrectionConfig {
    CorrectionConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        summary: args.summary.clone(),
        columns: ColumnNames {
            source_id: args.col_source_id.clone(),
            bp_rp: args.col_bp_rp.clone(),
            astrometric_params_solved: args.col_solved.clone(),
            phot_g_mean_mag: args.col_mag.clone(),
            phot_g_mean_flux: args.col_flux.clone(),
        },
        parallel: ParallelPolicy {
            min_parallel_len: args.parallel_min,
        },
    }
}
