//! avrcycles-core
//!
//! Core library for estimating AVR clock-cycle cost from disassembly listings.
//!
//! This crate defines the data model, the analysis pipeline (line
//! classification, instruction parsing, function segmentation, call-graph
//! resolution), listing dialects, and analyzer configuration.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends.

pub mod analysis;
pub mod config;
pub mod model;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
