//! Forecast/observation matching and error sampling
//!
//! For one decoded forecast file and the observation bucket at its valid
//! time, produces (variable, error) samples into an accumulator: direct
//! differences for most variables, circular differences for wind
//! direction, windowed differencing for precipitation, and a composite
//! (station, pressure) join for upper-air levels.
//!
//! ## Architecture
//!
//! - [`surface`] - Station-id join, scalar variables, precipitation windows
//! - [`levels`] - Upper-air level join and per-variable sampling

pub mod levels;
pub mod surface;

#[cfg(test)]
pub mod tests;

use serde::{Deserialize, Serialize};

use crate::app::models::{FileInfo, ObservationBucket};
use crate::app::services::aggregator::Accumulator;
use crate::app::services::precip::{PrecipIndex, PrecipWindow};
use crate::app::services::report_decoder::DecodedReport;
use crate::app::services::variables::Variable;

/// How to resolve several observation levels sharing one (station,
/// pressure) key
///
/// The report format does not forbid duplicate levels, so the join must
/// pick a policy rather than fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelMatchPolicy {
    /// Score against the first level seen for the key; ignore the rest
    #[default]
    FirstMatch,
    /// Treat duplicated keys as unusable and emit no samples for them
    RejectDuplicates,
}

/// Everything one forecast file's matching pass needs to read
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Filename metadata of the forecast being verified
    pub info: &'a FileInfo,
    /// Observation data at the forecast's valid time
    pub observations: &'a ObservationBucket,
    /// Monitored scalar surface variables
    pub surface_variables: &'a [Variable],
    /// Monitored upper-air variables
    pub upper_air_variables: &'a [Variable],
    /// Evaluated precipitation windows
    pub precip_windows: &'a [PrecipWindow],
    /// Cumulative forecast precipitation totals
    pub precip: &'a PrecipIndex,
    /// Duplicate-level resolution policy
    pub level_policy: LevelMatchPolicy,
}

/// Produce all samples for one forecast report into the accumulator
pub fn verify_report(ctx: &MatchContext<'_>, report: &DecodedReport, acc: &mut Accumulator) {
    surface::verify_surface(ctx, &report.stations, acc);
    levels::verify_levels(ctx, &report.levels, acc);
}
