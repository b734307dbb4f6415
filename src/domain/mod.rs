//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the per-source input record (`SourceRecord`) and solution classification
//! - correction outputs (`CorrectedPhotometry`, `CorrectedColumns`, `Regime`)
//! - run configuration (`CorrectionConfig`, `ColumnNames`, `ParallelPolicy`)

pub mod types;

pub use types::*;
