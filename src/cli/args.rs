//! Command-line argument definitions for the vfld verifier
//!
//! Defines the complete CLI interface using the clap derive API. The
//! positional arguments mirror the long-standing verification script
//! convention: time range, cycle interval, observation root, then one or
//! more experiment directories.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// CLI arguments for the forecast verifier
///
/// Verifies vfld forecast report files against vobs observation report
/// files and writes surface and upper-air bias/RMSE tables as CSV.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vfld-verify",
    version,
    about = "Verify vfld forecast files against vobs observations",
    long_about = "A batch verification tool that matches vfld forecast report files against \
                  vobs observation report files by station, valid time and pressure level, \
                  and aggregates bias/RMSE/sample-count statistics per experiment, lead time, \
                  valid time and variable. Results are written as two CSV tables suitable \
                  for scorecard and monitoring front-ends."
)]
pub struct Args {
    /// Earliest forecast base time to consider (YYYYMMDDHH)
    #[arg(value_name = "START")]
    pub start_time: i64,

    /// Latest forecast base time to consider (YYYYMMDDHH)
    #[arg(value_name = "END")]
    pub end_time: i64,

    /// Forecast cycle interval in hours
    ///
    /// Only cycles whose base hour is divisible by this interval are
    /// verified (e.g. 6 keeps the 00/06/12/18 UTC cycles).
    #[arg(value_name = "FCINT")]
    pub cycle_interval: i64,

    /// Observation archive root, scanned recursively for vobs files
    #[arg(value_name = "OBS_DIR")]
    pub observation_dir: PathBuf,

    /// Forecast experiment directories, one per experiment
    ///
    /// The directory basename becomes the experiment label in the output.
    #[arg(value_name = "EXP_DIR", required = true, num_args = 1..)]
    pub experiment_dirs: Vec<PathBuf>,

    /// Output directory for the metric CSV files
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = ".",
        help = "Output directory for surface_metrics.csv and temp_metrics.csv"
    )]
    pub output_dir: PathBuf,

    /// Number of parallel worker tasks
    ///
    /// Defaults to the number of logical CPUs.
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Reject ambiguous duplicate observation levels
    ///
    /// By default the first observation level seen for a (station,
    /// pressure) key is scored and later duplicates are ignored. With
    /// this flag, duplicated keys are excluded from scoring entirely.
    #[arg(long = "strict-levels", help = "Exclude duplicated observation levels from scoring")]
    pub strict_levels: bool,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Enable verbose logging (-v: debug, -vv: trace)",
        conflicts_with = "quiet"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", help = "Only show errors")]
    pub quiet: bool,
}

impl Args {
    /// Determine the tracing filter level from verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
