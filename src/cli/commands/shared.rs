//! Shared components for CLI commands
//!
//! Logging setup, progress reporting, configuration assembly and the
//! run-summary type used for final reporting.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::services::matcher::LevelMatchPolicy;
use crate::cli::args::Args;
use crate::config::{Config, VariableSelection};
use crate::{Error, Result};

/// Summary statistics for one verification run
#[derive(Debug, Clone, Default)]
pub struct VerificationSummary {
    /// Forecast files discovered after time-range and cycle filtering
    pub forecast_files: usize,
    /// Observation files discovered within the time range
    pub observation_files: usize,
    /// Valid times shared by all experiments and the observations
    pub common_valid_times: usize,
    /// Total admitted error samples across all buckets
    pub samples: u64,
    /// Rows written to the surface metrics table
    pub surface_rows: usize,
    /// Rows written to the upper-air metrics table
    pub level_rows: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

impl VerificationSummary {
    /// Human-readable one-block summary
    pub fn summary(&self) -> String {
        format!(
            "Verification Summary:\n\
             Files: {} forecast, {} observation ({} common valid times)\n\
             Samples: {} admitted\n\
             Output: {} surface rows, {} upper-air rows\n\
             Duration: {:.2}s",
            self.forecast_files,
            self.observation_files,
            self.common_valid_times,
            self.samples,
            self.surface_rows,
            self.level_rows,
            self.processing_time.as_secs_f64()
        )
    }

    /// Print the summary with a colored headline
    pub fn print(&self) {
        println!("{}", "Verification complete".green().bold());
        println!("{}", self.summary());
    }
}

/// Set up structured logging from CLI verbosity flags
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vfld_verify={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Assemble the run configuration from CLI arguments and the environment
pub fn build_config(args: &Args) -> Result<Config> {
    let workers = match args.workers {
        Some(0) => {
            return Err(Error::configuration("Worker count must be at least 1"));
        }
        Some(n) => n,
        None => num_cpus::get(),
    };

    let config = Config {
        start_time: args.start_time,
        end_time: args.end_time,
        cycle_interval: args.cycle_interval,
        observation_dir: args.observation_dir.clone(),
        experiment_dirs: args.experiment_dirs.clone(),
        output_dir: args.output_dir.clone(),
        workers,
        variables: VariableSelection::from_env(),
        level_policy: if args.strict_levels {
            LevelMatchPolicy::RejectDuplicates
        } else {
            LevelMatchPolicy::FirstMatch
        },
    };

    config.validate()?;
    Ok(config)
}

/// Build a styled progress bar for file processing
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
