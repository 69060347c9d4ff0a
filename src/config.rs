//! Configuration management and validation.
//!
//! Provides the run configuration assembled from CLI arguments plus
//! environment-variable overrides for the monitored variable sets.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app::services::matcher::LevelMatchPolicy;
use crate::app::services::precip::PrecipWindow;
use crate::app::services::variables::Variable;
use crate::constants::{
    DEFAULT_SURFACE_VARIABLES, DEFAULT_UPPER_AIR_VARIABLES, PRECIP_WINDOW_CANDIDATES,
    SURFACE_MONITOR_ENV, UPPER_AIR_MONITOR_ENV,
};
use crate::{Error, Result};

/// The monitored variable sets and precipitation windows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSelection {
    /// Scalar surface variables scored by direct matching
    pub surface: Vec<Variable>,
    /// Upper-air variables scored on matched pressure levels
    pub upper_air: Vec<Variable>,
    /// Precipitation windows scored by cumulative-total differencing
    pub precip_windows: Vec<PrecipWindow>,
}

impl Default for VariableSelection {
    fn default() -> Self {
        Self::from_specs(None, None)
    }
}

impl VariableSelection {
    /// Build the selection from the monitoring environment variables
    ///
    /// `SURFPAR_MONITOR` and `TEMPPAR_MONITOR` hold space-delimited
    /// variable names; unset variables fall back to the built-in sets.
    pub fn from_env() -> Self {
        Self::from_specs(
            std::env::var(SURFACE_MONITOR_ENV).ok().as_deref(),
            std::env::var(UPPER_AIR_MONITOR_ENV).ok().as_deref(),
        )
    }

    /// Build the selection from raw override strings
    ///
    /// Precipitation windows follow the surface override when one is
    /// given (only the windows it names are evaluated); with no override
    /// every candidate window is evaluated.
    pub fn from_specs(surface_spec: Option<&str>, upper_air_spec: Option<&str>) -> Self {
        let (surface, precip_windows) = match surface_spec {
            Some(spec) => parse_surface_names(spec.split_whitespace()),
            None => {
                let (surface, _) =
                    parse_surface_names(DEFAULT_SURFACE_VARIABLES.iter().copied());
                let all_windows = PRECIP_WINDOW_CANDIDATES
                    .iter()
                    .filter_map(|&(name, hours)| {
                        Variable::from_name(name).map(|variable| PrecipWindow { variable, hours })
                    })
                    .collect();
                (surface, all_windows)
            }
        };

        let upper_air = match upper_air_spec {
            Some(spec) => parse_variable_names(spec.split_whitespace()),
            None => parse_variable_names(DEFAULT_UPPER_AIR_VARIABLES.iter().copied()),
        };

        debug!(
            "Monitoring {} surface variables, {} upper-air variables, {} precipitation windows",
            surface.len(),
            upper_air.len(),
            precip_windows.len()
        );

        Self {
            surface,
            upper_air,
            precip_windows,
        }
    }
}

/// Parse a plain variable-name list, warning on unknown names
fn parse_variable_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<Variable> {
    names
        .filter_map(|name| {
            let variable = Variable::from_name(name);
            if variable.is_none() {
                warn!("Ignoring unknown monitored variable '{}'", name);
            }
            variable
        })
        .collect()
}

/// Parse a surface name list, separating windowed precipitation variables
fn parse_surface_names<'a>(
    names: impl Iterator<Item = &'a str>,
) -> (Vec<Variable>, Vec<PrecipWindow>) {
    let mut surface = Vec::new();
    let mut windows = Vec::new();
    for variable in parse_variable_names(names) {
        match variable.precip_window() {
            Some(hours) => windows.push(PrecipWindow { variable, hours }),
            None => surface.push(variable),
        }
    }
    (surface, windows)
}

/// Complete configuration for one verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Earliest base time considered, `YYYYMMDDHH`
    pub start_time: i64,
    /// Latest base time considered, `YYYYMMDDHH`
    pub end_time: i64,
    /// Forecast cycle interval in hours; base hours must be aligned
    pub cycle_interval: i64,
    /// Observation archive root (scanned recursively)
    pub observation_dir: PathBuf,
    /// One directory per forecast experiment
    pub experiment_dirs: Vec<PathBuf>,
    /// Directory receiving the metric CSV files
    pub output_dir: PathBuf,
    /// Worker task count for parsing and verification
    pub workers: usize,
    /// Monitored variables and windows
    pub variables: VariableSelection,
    /// Duplicate-level resolution policy for the upper-air join
    pub level_policy: LevelMatchPolicy,
}

impl Config {
    /// Validate the configuration, covering every fatal-error case that
    /// must stop the run before any work starts
    pub fn validate(&self) -> Result<()> {
        validate_timestamp(self.start_time, "start time")?;
        validate_timestamp(self.end_time, "end time")?;
        if self.start_time > self.end_time {
            return Err(Error::configuration(format!(
                "Start time {} is after end time {}",
                self.start_time, self.end_time
            )));
        }
        if self.cycle_interval < 1 {
            return Err(Error::configuration(format!(
                "Forecast cycle interval must be at least 1 hour, got {}",
                self.cycle_interval
            )));
        }
        if self.experiment_dirs.is_empty() {
            return Err(Error::configuration(
                "At least one forecast experiment directory is required",
            ));
        }
        if self.workers < 1 {
            return Err(Error::configuration("Worker count must be at least 1"));
        }
        Ok(())
    }
}

/// Check that a value reads as a plausible `YYYYMMDDHH` timestamp
fn validate_timestamp(value: i64, what: &str) -> Result<()> {
    let year = value / 1_000_000;
    let month = (value / 10_000) % 100;
    let day = (value / 100) % 100;
    let hour = value % 100;

    let plausible = (1900..=2999).contains(&year)
        && (1..=12).contains(&month)
        && (1..=31).contains(&day)
        && (0..=23).contains(&hour);
    if plausible {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "Invalid {} '{}': expected YYYYMMDDHH",
            what, value
        )))
    }
}
