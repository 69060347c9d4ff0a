//! Report file decoder for vfld/vobs data
//!
//! This module decodes the semi-structured whitespace-tokenized report
//! format into typed surface-station and upper-air level records under a
//! version-dependent column layout.
//!
//! ## Architecture
//!
//! - [`layout`] - Version-dependent column layouts and name-to-index maps
//! - [`decoder`] - File decoding, station and level block parsing
//!
//! ## Error containment
//!
//! A single malformed file must never abort the batch: the decoding entry
//! point returns empty collections for unopenable paths and logs a warning
//! (discarding partial results) when a file's content cannot be parsed.

pub mod decoder;
pub mod layout;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use decoder::{DecodedReport, decode_report};
pub use layout::ColumnLayout;
