//! Fixtures and helpers for matcher testing

mod level_tests;

use std::path::PathBuf;

use crate::app::models::{FileInfo, ObservationBucket, ReportKind, SurfaceStation, TempLevel};
use crate::app::services::matcher::{LevelMatchPolicy, MatchContext};
use crate::app::services::precip::{PrecipIndex, PrecipWindow};
use crate::app::services::variables::Variable;

/// A forecast file at base 2023-06-15 00z, lead 6h
pub fn forecast_info() -> FileInfo {
    FileInfo {
        path: PathBuf::from("vfldTEST202306150006"),
        kind: ReportKind::Forecast,
        experiment: "test".to_string(),
        base_time: 2023061500,
        lead_time: 6,
        valid_time: 2023061506,
    }
}

pub fn surface_station(id: i32) -> SurfaceStation {
    SurfaceStation {
        id,
        lat: 60.0,
        lon: 25.0,
        ..Default::default()
    }
}

pub fn temp_level(station_id: i32, pressure: f64) -> TempLevel {
    TempLevel {
        station_id,
        pressure,
        ..Default::default()
    }
}

pub fn observations_with(stations: Vec<SurfaceStation>, levels: Vec<TempLevel>) -> ObservationBucket {
    let mut bucket = ObservationBucket::default();
    for station in stations {
        bucket.stations.insert(station.id, station);
    }
    bucket.levels = levels;
    bucket
}

/// A context borrowing the given pieces, with sensible test defaults
pub struct ContextFixture {
    pub info: FileInfo,
    pub observations: ObservationBucket,
    pub surface_variables: Vec<Variable>,
    pub upper_air_variables: Vec<Variable>,
    pub precip_windows: Vec<PrecipWindow>,
    pub precip: PrecipIndex,
    pub level_policy: LevelMatchPolicy,
}

impl ContextFixture {
    pub fn new(observations: ObservationBucket) -> Self {
        Self {
            info: forecast_info(),
            observations,
            surface_variables: vec![Variable::Tt],
            upper_air_variables: vec![Variable::Tt],
            precip_windows: Vec::new(),
            precip: PrecipIndex::default(),
            level_policy: LevelMatchPolicy::FirstMatch,
        }
    }

    pub fn context(&self) -> MatchContext<'_> {
        MatchContext {
            info: &self.info,
            observations: &self.observations,
            surface_variables: &self.surface_variables,
            upper_air_variables: &self.upper_air_variables,
            precip_windows: &self.precip_windows,
            precip: &self.precip,
            level_policy: self.level_policy,
        }
    }
}
