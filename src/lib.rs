//! `gaia-gcorr` library crate.
//!
//! The binary (`gcorr`) is a thin wrapper around this library so that:
//!
//! - the correction engine is testable without spawning processes
//! - the engine can be used directly on in-memory columns or arrays
//! - table I/O and reporting stay out of the numeric core

pub mod app;
pub mod cli;
pub mod correction;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
