//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - corrected-table CSV and summary JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
