//! The verification pipeline
//!
//! Orchestrates the full run: discovery, the common-valid-time check, the
//! observation and precipitation index builds, the parallel verification
//! pass, and CSV emission. Phases are strictly sequential; within the
//! index-build and verification phases, work fans out across files.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::info;

use crate::app::models::{FileInfo, ObservationIndex, ReportKind};
use crate::app::services::aggregator::Accumulator;
use crate::app::services::discovery::{
    common_valid_times, discover_forecast_files, discover_observation_files,
};
use crate::app::services::matcher::{MatchContext, verify_report};
use crate::app::services::obs_index::build_observation_index;
use crate::app::services::precip::{PrecipIndex, build_precip_index};
use crate::app::services::report_decoder::decode_report;
use crate::app::services::report_writer::{write_level_metrics, write_surface_metrics};
use crate::cli::args::Args;
use crate::cli::commands::shared::{VerificationSummary, build_config, create_progress_bar};
use crate::config::Config;
use crate::constants::{SURFACE_METRICS_FILENAME, TEMP_METRICS_FILENAME};
use crate::{Error, Result};

/// Run verification from CLI arguments
pub async fn run_verify(args: Args) -> Result<VerificationSummary> {
    let config = build_config(&args)?;
    let summary = run_verification(&config, args.show_progress()).await?;
    if !args.quiet {
        summary.print();
    }
    Ok(summary)
}

/// Run the complete verification pipeline for a validated configuration
///
/// Fatal configuration errors (empty file sets, no common valid time)
/// abort before any output file is touched.
pub async fn run_verification(
    config: &Config,
    show_progress: bool,
) -> Result<VerificationSummary> {
    config.validate()?;
    let run_start = Instant::now();

    // Phase 1: discovery
    info!("Discovering and parsing filenames...");
    let forecast_files = discover_forecast_files(
        &config.experiment_dirs,
        config.start_time,
        config.end_time,
        config.cycle_interval,
    )?;
    let observation_files =
        discover_observation_files(&config.observation_dir, config.start_time, config.end_time)?;
    info!(
        "Found {} observation files and {} forecast files (after cycle filter)",
        observation_files.len(),
        forecast_files.len()
    );

    if forecast_files.is_empty() || observation_files.is_empty() {
        return Err(Error::configuration(
            "No data files found. Check paths and date range.",
        ));
    }

    let common = common_valid_times(&forecast_files, &observation_files);
    info!("Common valid times across experiments and observations: {}", common.len());
    if common.is_empty() {
        return Err(Error::configuration(
            "No common valid times across experiments and observations within the given range",
        ));
    }

    let mut summary = VerificationSummary {
        forecast_files: forecast_files.len(),
        observation_files: observation_files.len(),
        common_valid_times: common.len(),
        ..Default::default()
    };

    // Phase 2: observation index (parallel parse, serialized merge, then
    // frozen behind the Arc for the read-only phase)
    let index_start = Instant::now();
    let observations = build_observation_index(observation_files, config.workers).await?;
    info!(
        "Observation index built in {:.2}s",
        index_start.elapsed().as_secs_f64()
    );

    // Phase 3: cumulative precipitation prepass over every discovered
    // forecast file; leads without a matching observation still supply
    // window endpoints
    let precip = if config.variables.precip_windows.is_empty() {
        info!("Skipping precipitation accumulation (no PE windows selected)");
        Arc::new(PrecipIndex::default())
    } else {
        build_precip_index(&forecast_files, config.workers).await?
    };

    let forecasts: Vec<FileInfo> = forecast_files
        .into_iter()
        .filter(|info| common.contains(&info.valid_time))
        .collect();

    // Phase 4: parallel verification
    let verify_start = Instant::now();
    info!("Starting verification of {} forecast files...", forecasts.len());
    let progress = show_progress
        .then(|| create_progress_bar(forecasts.len() as u64, "Verifying forecast files..."));

    let global = verify_forecasts(config, forecasts, observations, precip, progress.clone()).await?;

    if let Some(pb) = &progress {
        pb.finish_with_message("Verification pass complete");
    }
    info!(
        "Verification processing took {:.2}s",
        verify_start.elapsed().as_secs_f64()
    );

    // Phase 5: report emission
    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        Error::io(
            format!("Cannot create output directory {}", config.output_dir.display()),
            e,
        )
    })?;
    summary.samples = global.sample_count();
    summary.surface_rows = write_surface_metrics(
        &config.output_dir.join(SURFACE_METRICS_FILENAME),
        &global.surface,
    )?;
    summary.level_rows = write_level_metrics(
        &config.output_dir.join(TEMP_METRICS_FILENAME),
        &global.levels,
    )?;

    summary.processing_time = run_start.elapsed();
    info!(
        "Total run time: {:.2}s",
        summary.processing_time.as_secs_f64()
    );
    Ok(summary)
}

/// Fan the forecast files out over the worker pool
///
/// Each worker owns a private accumulator and merges it into the global
/// result exactly once, when its share of the queue is drained.
async fn verify_forecasts(
    config: &Config,
    forecasts: Vec<FileInfo>,
    observations: Arc<ObservationIndex>,
    precip: Arc<PrecipIndex>,
    progress: Option<ProgressBar>,
) -> Result<Accumulator> {
    let shared_config = Arc::new(config.clone());
    let queue = Arc::new(Mutex::new(forecasts.into_iter().collect::<VecDeque<_>>()));
    let mut tasks: JoinSet<Accumulator> = JoinSet::new();

    for _ in 0..config.workers.max(1) {
        let queue = queue.clone();
        let observations = observations.clone();
        let precip = precip.clone();
        let config = shared_config.clone();
        let progress = progress.clone();

        tasks.spawn(async move {
            let mut local = Accumulator::new();
            loop {
                let next = queue.lock().await.pop_front();
                let Some(info) = next else { break };

                // A valid time without observations contributes nothing;
                // that is expected, not an error
                if let Some(bucket) = observations.get(&info.valid_time) {
                    let report = decode_report(&info.path, ReportKind::Forecast);
                    let ctx = MatchContext {
                        info: &info,
                        observations: bucket,
                        surface_variables: &config.variables.surface,
                        upper_air_variables: &config.variables.upper_air,
                        precip_windows: &config.variables.precip_windows,
                        precip: &precip,
                        level_policy: config.level_policy,
                    };
                    verify_report(&ctx, &report, &mut local);
                }

                if let Some(pb) = &progress {
                    pb.inc(1);
                }
            }
            local
        });
    }

    let mut global = Accumulator::new();
    while let Some(local) = tasks.join_next().await {
        global.merge(local?);
    }
    Ok(global)
}
