//! Variable kinds and value access
//!
//! Centralizes the binding between variable names as they appear in report
//! files and the fields on decoded records, so the rest of the system never
//! branches on variable identity more than once. The name table is built
//! once at startup; per-sample dispatch is a plain enum match.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::app::models::{SurfaceStation, TempLevel};
use crate::constants::{MISSING, MISSING_THRESHOLD};

/// A verifiable meteorological variable
///
/// Declaration order is the tie-break order used in aggregation keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Variable {
    /// Mean sea level pressure
    Ps,
    /// Station pressure
    Sps,
    /// Wind speed
    Ff,
    /// Maximum wind gust
    Gx,
    /// Wind direction
    Dd,
    /// 2m temperature
    Tt,
    /// Height-adjusted 2m temperature
    Ttha,
    /// Minimum temperature
    Tn,
    /// Maximum temperature
    Tx,
    /// Dewpoint temperature
    Td,
    /// Dewpoint depression (derived: TT - TD)
    Tdd,
    /// Relative humidity
    Rh,
    /// Specific humidity
    Qq,
    /// Total cloud cover
    Nn,
    /// Low cloud cover
    Lc,
    /// Cloud base height
    Ch,
    /// Visibility
    Vi,
    /// Wind gust
    Gg,
    /// Maximum wind speed
    Fx,
    /// Cumulative precipitation since forecast start
    Pe,
    /// Precipitation accumulated over the trailing 1h window
    Pe1,
    /// Precipitation accumulated over the trailing 3h window
    Pe3,
    /// Precipitation accumulated over the trailing 6h window
    Pe6,
    /// Precipitation accumulated over the trailing 12h window
    Pe12,
    /// Precipitation accumulated over the trailing 24h window
    Pe24,
    /// Geopotential height (upper-air only)
    Fi,
}

/// All supported variables, in key tie-break order
const ALL_VARIABLES: &[Variable] = &[
    Variable::Ps,
    Variable::Sps,
    Variable::Ff,
    Variable::Gx,
    Variable::Dd,
    Variable::Tt,
    Variable::Ttha,
    Variable::Tn,
    Variable::Tx,
    Variable::Td,
    Variable::Tdd,
    Variable::Rh,
    Variable::Qq,
    Variable::Nn,
    Variable::Lc,
    Variable::Ch,
    Variable::Vi,
    Variable::Gg,
    Variable::Fx,
    Variable::Pe,
    Variable::Pe1,
    Variable::Pe3,
    Variable::Pe6,
    Variable::Pe12,
    Variable::Pe24,
    Variable::Fi,
];

fn name_table() -> &'static HashMap<&'static str, Variable> {
    static TABLE: OnceLock<HashMap<&'static str, Variable>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table: HashMap<&'static str, Variable> = ALL_VARIABLES
            .iter()
            .map(|&variable| (variable.name(), variable))
            .collect();
        // Station pressure appears as SPS or PSS depending on file origin
        table.insert("PSS", Variable::Sps);
        table
    })
}

impl Variable {
    /// Look up a variable by its report-file column name
    ///
    /// Returns `None` for unsupported names.
    pub fn from_name(name: &str) -> Option<Self> {
        name_table().get(name).copied()
    }

    /// The canonical column name for this variable
    pub const fn name(self) -> &'static str {
        match self {
            Variable::Ps => "PS",
            Variable::Sps => "SPS",
            Variable::Ff => "FF",
            Variable::Gx => "GX",
            Variable::Dd => "DD",
            Variable::Tt => "TT",
            Variable::Ttha => "TTHA",
            Variable::Tn => "TN",
            Variable::Tx => "TX",
            Variable::Td => "TD",
            Variable::Tdd => "TDD",
            Variable::Rh => "RH",
            Variable::Qq => "QQ",
            Variable::Nn => "NN",
            Variable::Lc => "LC",
            Variable::Ch => "CH",
            Variable::Vi => "VI",
            Variable::Gg => "GG",
            Variable::Fx => "FX",
            Variable::Pe => "PE",
            Variable::Pe1 => "PE1",
            Variable::Pe3 => "PE3",
            Variable::Pe6 => "PE6",
            Variable::Pe12 => "PE12",
            Variable::Pe24 => "PE24",
            Variable::Fi => "FI",
        }
    }

    /// Whether errors for this variable use the circular directional difference
    pub const fn is_wind_direction(self) -> bool {
        matches!(self, Variable::Dd)
    }

    /// The trailing accumulation window in hours, for windowed precipitation
    /// variables only
    pub const fn precip_window(self) -> Option<i32> {
        match self {
            Variable::Pe1 => Some(1),
            Variable::Pe3 => Some(3),
            Variable::Pe6 => Some(6),
            Variable::Pe12 => Some(12),
            Variable::Pe24 => Some(24),
            _ => None,
        }
    }

    /// Read this variable from a surface station record
    ///
    /// Total over the variable set: kinds without a surface field return the
    /// missing sentinel. The derived dewpoint depression is computed here,
    /// gated on both terms being valid on this record.
    pub fn surface_value(self, station: &SurfaceStation) -> f64 {
        match self {
            Variable::Ps => station.ps,
            Variable::Sps => station.sps,
            Variable::Ff => station.ff,
            Variable::Gx => station.gx,
            Variable::Dd => station.dd,
            Variable::Tt => station.tt,
            Variable::Ttha => station.ttha,
            Variable::Tn => station.tn,
            Variable::Tx => station.tx,
            Variable::Td => station.td,
            Variable::Tdd => {
                if !is_missing(station.tt) && !is_missing(station.td) {
                    station.tt - station.td
                } else {
                    MISSING
                }
            }
            Variable::Rh => station.rh,
            Variable::Qq => station.qq,
            Variable::Nn => station.nn,
            Variable::Lc => station.lc,
            Variable::Ch => station.ch,
            Variable::Vi => station.vi,
            Variable::Gg => station.gg,
            Variable::Fx => station.fx,
            Variable::Pe => station.pe,
            Variable::Pe1 => station.pe1,
            Variable::Pe3 => station.pe3,
            Variable::Pe6 => station.pe6,
            Variable::Pe12 => station.pe12,
            Variable::Pe24 => station.pe24,
            Variable::Fi => MISSING,
        }
    }

    /// Read this variable from an upper-air level record
    ///
    /// Total over the variable set: surface-only kinds return the missing
    /// sentinel.
    pub fn level_value(self, level: &TempLevel) -> f64 {
        match self {
            Variable::Tt => level.temperature,
            Variable::Td => level.dewpoint,
            Variable::Fi => level.geopotential,
            Variable::Rh => level.rel_humidity,
            Variable::Qq => level.spec_humidity,
            Variable::Dd => level.wind_dir,
            Variable::Ff => level.wind_speed,
            _ => MISSING,
        }
    }
}

/// The single missing-value predicate used everywhere a reading is validated
pub fn is_missing(value: f64) -> bool {
    value < MISSING_THRESHOLD
}

/// Circular wind-direction difference, normalized into (-180, 180]
pub fn directional_diff(forecast: f64, observed: f64) -> f64 {
    if is_missing(forecast) || is_missing(observed) {
        return MISSING;
    }
    let mut diff = forecast - observed;
    while diff > 180.0 {
        diff -= 360.0;
    }
    while diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for &variable in ALL_VARIABLES {
            assert_eq!(Variable::from_name(variable.name()), Some(variable));
        }
    }

    #[test]
    fn test_station_pressure_alias() {
        assert_eq!(Variable::from_name("PSS"), Some(Variable::Sps));
        assert_eq!(Variable::from_name("SPS"), Some(Variable::Sps));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Variable::from_name("XYZ"), None);
        assert_eq!(Variable::from_name(""), None);
    }

    #[test]
    fn test_missing_predicate() {
        assert!(is_missing(-999.0));
        assert!(is_missing(-1000.0));
        assert!(!is_missing(-998.0));
        assert!(!is_missing(0.0));
        assert!(!is_missing(15.0));
    }

    #[test]
    fn test_surface_accessor() {
        let station = SurfaceStation {
            tt: 15.0,
            dd: 270.0,
            ..Default::default()
        };
        assert_eq!(Variable::Tt.surface_value(&station), 15.0);
        assert_eq!(Variable::Dd.surface_value(&station), 270.0);
        assert!(is_missing(Variable::Rh.surface_value(&station)));
        // Geopotential has no surface field
        assert!(is_missing(Variable::Fi.surface_value(&station)));
    }

    #[test]
    fn test_dewpoint_depression_requires_both_terms() {
        let mut station = SurfaceStation {
            tt: 15.0,
            td: 10.0,
            ..Default::default()
        };
        assert_eq!(Variable::Tdd.surface_value(&station), 5.0);

        station.td = -999.0;
        assert!(is_missing(Variable::Tdd.surface_value(&station)));

        station.td = 10.0;
        station.tt = -999.0;
        assert!(is_missing(Variable::Tdd.surface_value(&station)));
    }

    #[test]
    fn test_level_accessor() {
        let level = TempLevel {
            station_id: 1,
            pressure: 850.0,
            temperature: -5.0,
            wind_speed: 12.0,
            ..Default::default()
        };
        assert_eq!(Variable::Tt.level_value(&level), -5.0);
        assert_eq!(Variable::Ff.level_value(&level), 12.0);
        assert!(is_missing(Variable::Td.level_value(&level)));
        // Surface-only kinds have no level field
        assert!(is_missing(Variable::Ps.level_value(&level)));
    }

    #[test]
    fn test_directional_diff_wraps() {
        assert_eq!(directional_diff(350.0, 10.0), -20.0);
        assert_eq!(directional_diff(10.0, 350.0), 20.0);
        assert_eq!(directional_diff(90.0, 90.0), 0.0);
        // Result is always in (-180, 180]
        assert_eq!(directional_diff(270.0, 90.0), 180.0);
        assert_eq!(directional_diff(90.0, 270.0), 180.0);
    }

    #[test]
    fn test_directional_diff_missing_sides() {
        assert!(is_missing(directional_diff(-999.0, 10.0)));
        assert!(is_missing(directional_diff(10.0, -999.0)));
    }

    #[test]
    fn test_precip_windows() {
        assert_eq!(Variable::Pe3.precip_window(), Some(3));
        assert_eq!(Variable::Pe24.precip_window(), Some(24));
        assert_eq!(Variable::Pe.precip_window(), None);
        assert_eq!(Variable::Tt.precip_window(), None);
    }
}
