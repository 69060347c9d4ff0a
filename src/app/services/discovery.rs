//! Report file discovery and filename metadata
//!
//! Turns directory trees into [`FileInfo`] lists: forecast experiment
//! directories are scanned flat, the observation archive recursively.
//! Filenames encode all the metadata the verifier needs; files whose
//! names do not match the expected patterns are ignored.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::app::models::{FileInfo, ReportKind};
use crate::constants::{
    FORECAST_FILE_PREFIX, OBSERVATION_EXPERIMENT_LABEL, OBSERVATION_FILE_PREFIX,
};
use crate::timeops::{add_hours, hour_of_day};
use crate::{Error, Result};

/// Trailing `<YYYYMMDDHH><LL>` of a forecast filename
fn forecast_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(20\d{6})(\d{2})(\d{2})$").expect("valid regex"))
}

/// Trailing `<YYYYMMDDHH>` of an observation filename
fn observation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(20\d{6})(\d{2})$").expect("valid regex"))
}

/// Decode filename metadata, if the name matches a known report pattern
pub fn parse_filename(path: &Path) -> Option<FileInfo> {
    let basename = path.file_name()?.to_str()?;

    if basename.starts_with(FORECAST_FILE_PREFIX) {
        let captures = forecast_pattern().captures(basename)?;
        let base_time: i64 = format!("{}{}", &captures[1], &captures[2]).parse().ok()?;
        let lead_time: i32 = captures[3].parse().ok()?;
        Some(FileInfo {
            path: path.to_path_buf(),
            kind: ReportKind::Forecast,
            experiment: String::new(),
            base_time,
            lead_time,
            valid_time: add_hours(base_time, lead_time as i64),
        })
    } else if basename.starts_with(OBSERVATION_FILE_PREFIX) {
        let captures = observation_pattern().captures(basename)?;
        let valid_time: i64 = format!("{}{}", &captures[1], &captures[2]).parse().ok()?;
        Some(FileInfo {
            path: path.to_path_buf(),
            kind: ReportKind::Observation,
            experiment: OBSERVATION_EXPERIMENT_LABEL.to_string(),
            base_time: valid_time,
            lead_time: 0,
            valid_time,
        })
    } else {
        None
    }
}

/// Experiment label for a forecast directory
///
/// The directory's basename, falling back to the parent's basename when a
/// trailing separator leaves it empty.
pub fn experiment_label(dir: &Path) -> String {
    dir.file_name()
        .or_else(|| dir.parent().and_then(|parent| parent.file_name()))
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string_lossy().into_owned())
}

/// Discover forecast files across all experiment directories
///
/// Keeps files whose base time falls within `[start, end]` and whose base
/// hour is aligned with the forecast cycle interval. Logs the maximum lead
/// time found per experiment.
pub fn discover_forecast_files(
    experiment_dirs: &[std::path::PathBuf],
    start: i64,
    end: i64,
    cycle_interval: i64,
) -> Result<Vec<FileInfo>> {
    let mut files = Vec::new();
    let mut max_lead: HashMap<String, i32> = HashMap::new();

    for dir in experiment_dirs {
        let experiment = experiment_label(dir);
        info!(
            "Searching for forecast files for experiment '{}' in {}",
            experiment,
            dir.display()
        );
        max_lead.entry(experiment.clone()).or_insert(0);

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(
                    format!("Cannot scan experiment directory {}", dir.display()),
                    e,
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(mut info) = parse_filename(entry.path()) else {
                continue;
            };
            if info.kind != ReportKind::Forecast {
                continue;
            }
            if info.base_time < start || info.base_time > end {
                continue;
            }
            if hour_of_day(info.base_time) % cycle_interval != 0 {
                continue;
            }

            info.experiment = experiment.clone();
            let entry_max = max_lead.entry(experiment.clone()).or_insert(0);
            *entry_max = (*entry_max).max(info.lead_time);
            files.push(info);
        }
    }

    for (experiment, lead) in &max_lead {
        info!("Max lead time found for {}: +{}h", experiment, lead);
    }
    debug!("Discovered {} forecast files", files.len());

    Ok(files)
}

/// Discover observation files under the archive root, recursively
///
/// Keeps files whose valid time falls within `[start, end]`.
pub fn discover_observation_files(
    obs_dir: &Path,
    start: i64,
    end: i64,
) -> Result<Vec<FileInfo>> {
    info!("Searching for observation files in {}", obs_dir.display());

    let mut files = Vec::new();
    for entry in WalkDir::new(obs_dir) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(
                format!("Cannot scan observation directory {}", obs_dir.display()),
                e,
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(info) = parse_filename(entry.path()) else {
            continue;
        };
        if info.kind != ReportKind::Observation {
            continue;
        }
        if info.valid_time < start || info.valid_time > end {
            continue;
        }
        files.push(info);
    }

    debug!("Discovered {} observation files", files.len());
    Ok(files)
}

/// Valid times shared by every experiment and the observation set
///
/// Verification is restricted to this intersection so that scores stay
/// comparable across experiments.
pub fn common_valid_times(
    forecast_files: &[FileInfo],
    observation_files: &[FileInfo],
) -> HashSet<i64> {
    let mut per_experiment: HashMap<&str, HashSet<i64>> = HashMap::new();
    for info in forecast_files {
        per_experiment
            .entry(info.experiment.as_str())
            .or_default()
            .insert(info.valid_time);
    }

    let observation_times: HashSet<i64> = observation_files
        .iter()
        .map(|info| info.valid_time)
        .collect();

    let mut experiments = per_experiment.values();
    let Some(first) = experiments.next() else {
        return HashSet::new();
    };

    let mut common = first.clone();
    for times in experiments {
        common.retain(|time| times.contains(time));
    }
    common.retain(|time| observation_times.contains(time));
    common
}
