//! G-band magnitude/flux correction for 6-parameter astrometric solutions.
//!
//! The engine is a pure, element-wise transform:
//! - `calibration`: thresholds, clip bounds and the two cubic coefficient sets
//! - `engine`: classification plus the record, column and n-d array call shapes

pub mod calibration;
pub mod engine;

pub use calibration::*;
pub use engine::*;
