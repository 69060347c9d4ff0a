//! Core data models for forecast verification
//!
//! These types represent decoded report-file records and the filename
//! metadata that drives matching. Records are built fresh per file parse
//! and never mutated after construction.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::MISSING;

/// Role of a report file, fixed at parse time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// vfld file: model output at station locations
    Forecast,
    /// vobs file: quality-controlled observations
    Observation,
}

/// One surface (SYNOP) station record from a report file
///
/// Every meteorological field defaults to the missing sentinel and is only
/// populated when the file's column layout names it and the data row is
/// long enough.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceStation {
    pub id: i32,
    pub lat: f64,
    pub lon: f64,
    pub height: f64,
    /// Total cloud cover
    pub nn: f64,
    /// Wind direction (degrees)
    pub dd: f64,
    /// Wind speed
    pub ff: f64,
    /// 2m temperature
    pub tt: f64,
    /// 2m temperature, height-adjusted
    pub ttha: f64,
    /// Relative humidity
    pub rh: f64,
    /// Mean sea level pressure
    pub ps: f64,
    /// Station pressure
    pub sps: f64,
    /// Cumulative precipitation since forecast start (forecast files only)
    pub pe: f64,
    /// Observed precipitation accumulations over fixed windows
    pub pe1: f64,
    pub pe3: f64,
    pub pe6: f64,
    pub pe12: f64,
    pub pe24: f64,
    /// Specific humidity
    pub qq: f64,
    /// Visibility
    pub vi: f64,
    /// Dewpoint temperature
    pub td: f64,
    /// Maximum temperature
    pub tx: f64,
    /// Minimum temperature
    pub tn: f64,
    /// Wind gust
    pub gg: f64,
    /// Maximum wind gust
    pub gx: f64,
    /// Maximum wind speed
    pub fx: f64,
    /// Cloud base height
    pub ch: f64,
    /// Low cloud cover
    pub lc: f64,
}

impl Default for SurfaceStation {
    fn default() -> Self {
        Self {
            id: -1,
            lat: MISSING,
            lon: MISSING,
            height: MISSING,
            nn: MISSING,
            dd: MISSING,
            ff: MISSING,
            tt: MISSING,
            ttha: MISSING,
            rh: MISSING,
            ps: MISSING,
            sps: MISSING,
            pe: MISSING,
            pe1: MISSING,
            pe3: MISSING,
            pe6: MISSING,
            pe12: MISSING,
            pe24: MISSING,
            qq: MISSING,
            vi: MISSING,
            td: MISSING,
            tx: MISSING,
            tn: MISSING,
            gg: MISSING,
            gx: MISSING,
            fx: MISSING,
            ch: MISSING,
            lc: MISSING,
        }
    }
}

/// One upper-air (TEMP sounding) level record
///
/// A station contributes one record per reported pressure level, so
/// `station_id` is not unique within a file.
#[derive(Debug, Clone, PartialEq)]
pub struct TempLevel {
    pub station_id: i32,
    /// Pressure level (hPa), key component for level matching
    pub pressure: f64,
    pub temperature: f64,
    pub dewpoint: f64,
    /// Geopotential height
    pub geopotential: f64,
    pub rel_humidity: f64,
    pub spec_humidity: f64,
    pub wind_dir: f64,
    pub wind_speed: f64,
}

impl Default for TempLevel {
    fn default() -> Self {
        Self {
            station_id: -1,
            pressure: MISSING,
            temperature: MISSING,
            dewpoint: MISSING,
            geopotential: MISSING,
            rel_humidity: MISSING,
            spec_humidity: MISSING,
            wind_dir: MISSING,
            wind_speed: MISSING,
        }
    }
}

/// Metadata decoded from a report filename
///
/// Produced once during discovery, immutable afterwards; drives all
/// time and key logic during matching.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub kind: ReportKind,
    /// Owning experiment label (directory basename for forecasts)
    pub experiment: String,
    /// Forecast cycle start, `YYYYMMDDHH`
    pub base_time: i64,
    /// Hours between base time and valid time (0 for observations)
    pub lead_time: i32,
    /// The timestamp the file's values pertain to, `YYYYMMDDHH`
    pub valid_time: i64,
}

/// All observation data sharing one valid time
///
/// Stations are keyed by id with last-write-wins semantics when several
/// observation files cover the same valid time; level records are an
/// order-irrelevant sequence.
#[derive(Debug, Default, Clone)]
pub struct ObservationBucket {
    pub stations: HashMap<i32, SurfaceStation>,
    pub levels: Vec<TempLevel>,
}

/// Observation lookup table keyed by valid time
///
/// Built once during the (parallel-parse, serialized-merge) build phase,
/// then shared read-only behind an `Arc` by all verification workers.
pub type ObservationIndex = HashMap<i64, ObservationBucket>;
