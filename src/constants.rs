//! Application constants for the vfld verifier
//!
//! This module contains the missing-value convention, the legacy column
//! layout, default monitored variable sets, and output file names used
//! throughout the application.

// =============================================================================
// Missing Value Convention
// =============================================================================

/// Sentinel written into any field that carries no reading
pub const MISSING: f64 = -999.0;

/// Readings below this threshold are treated as missing everywhere
pub const MISSING_THRESHOLD: f64 = -998.0;

// =============================================================================
// Report File Format
// =============================================================================

/// Surface variable layout for report files with format version <= 3
///
/// Later versions carry an explicit variable list in the file instead.
pub const LEGACY_SURFACE_LAYOUT: &[&str] = &[
    "NN", "DD", "FF", "TT", "RH", "PS", "PE", "QQ", "VI", "TD", "TX", "TN", "GG", "GX", "FX",
];

/// Highest format version using the fixed legacy layout
pub const LEGACY_LAYOUT_MAX_VERSION: i32 = 3;

/// Format versions carrying an explicit variable-name list
pub const NAMED_LAYOUT_VERSIONS: &[i32] = &[4, 5];

/// Resolution used when keying upper-air levels by pressure (0.01 hPa)
pub const PRESSURE_KEY_SCALE: f64 = 100.0;

// =============================================================================
// Monitored Variables
// =============================================================================

/// Default surface variables to verify (order defines output emphasis)
pub const DEFAULT_SURFACE_VARIABLES: &[&str] = &[
    "PS", "SPS", "FF", "GX", "DD", "TT", "TTHA", "TN", "TX", "TD", "TDD", "RH", "QQ", "NN", "LC",
    "CH", "VI",
];

/// Default upper-air variables to verify
pub const DEFAULT_UPPER_AIR_VARIABLES: &[&str] = &["TT", "TD", "FF", "DD", "FI", "RH", "QQ"];

/// Precipitation window candidates: accumulation variable name and window hours
pub const PRECIP_WINDOW_CANDIDATES: &[(&str, i32)] =
    &[("PE1", 1), ("PE3", 3), ("PE6", 6), ("PE12", 12), ("PE24", 24)];

/// Environment variable overriding the monitored surface variable set
pub const SURFACE_MONITOR_ENV: &str = "SURFPAR_MONITOR";

/// Environment variable overriding the monitored upper-air variable set
pub const UPPER_AIR_MONITOR_ENV: &str = "TEMPPAR_MONITOR";

// =============================================================================
// Output
// =============================================================================

/// Surface metrics output filename
pub const SURFACE_METRICS_FILENAME: &str = "surface_metrics.csv";

/// Upper-air metrics output filename
pub const TEMP_METRICS_FILENAME: &str = "temp_metrics.csv";

/// Decimal places for floating-point metric columns
pub const METRIC_DECIMALS: usize = 6;

// =============================================================================
// Filename Patterns
// =============================================================================

/// Prefix of forecast report filenames
pub const FORECAST_FILE_PREFIX: &str = "vfld";

/// Prefix of observation report filenames
pub const OBSERVATION_FILE_PREFIX: &str = "vobs";

/// Experiment label assigned to observation files
pub const OBSERVATION_EXPERIMENT_LABEL: &str = "observation";
