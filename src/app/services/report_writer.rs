//! CSV metric report emission
//!
//! Serializes the final aggregation maps into the two flat metric tables.
//! Keys iterate in their total order, so output is deterministic for a
//! given input set regardless of worker scheduling.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::app::services::aggregator::{AggregatedStats, LevelKey, SurfaceKey};
use crate::constants::METRIC_DECIMALS;
use crate::{Error, Result};

/// Write the surface metrics table
///
/// Buckets with zero samples are omitted; an existing file is replaced.
pub fn write_surface_metrics(
    path: &Path,
    results: &BTreeMap<SurfaceKey, AggregatedStats>,
) -> Result<usize> {
    info!("Saving surface metrics to {}", path.display());

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_writing(format!("Cannot create {}", path.display()), e))?;

    writer.write_record([
        "experiment",
        "lead_time",
        "vt_hour",
        "obstypevar",
        "bias",
        "rmse",
        "n_samples",
    ])?;

    let mut rows = 0usize;
    for (key, stats) in results {
        let Some((bias, rmse)) = stats.finalize() else {
            continue;
        };
        writer.write_record([
            key.experiment.clone(),
            key.lead_time.to_string(),
            key.valid_time.to_string(),
            key.variable.name().to_string(),
            format!("{:.*}", METRIC_DECIMALS, bias),
            format!("{:.*}", METRIC_DECIMALS, rmse),
            stats.count.to_string(),
        ])?;
        rows += 1;
    }

    writer.flush().map_err(|e| Error::io("Cannot flush surface metrics", e))?;
    Ok(rows)
}

/// Write the upper-air metrics table
///
/// Same layout as the surface table plus the pressure level column.
pub fn write_level_metrics(
    path: &Path,
    results: &BTreeMap<LevelKey, AggregatedStats>,
) -> Result<usize> {
    info!("Saving upper-air metrics to {}", path.display());

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_writing(format!("Cannot create {}", path.display()), e))?;

    writer.write_record([
        "experiment",
        "lead_time",
        "vt_hour",
        "pressure_level",
        "obstypevar",
        "bias",
        "rmse",
        "n_samples",
    ])?;

    let mut rows = 0usize;
    for (key, stats) in results {
        let Some((bias, rmse)) = stats.finalize() else {
            continue;
        };
        writer.write_record([
            key.experiment.clone(),
            key.lead_time.to_string(),
            key.valid_time.to_string(),
            format!("{:.*}", METRIC_DECIMALS, key.pressure_hpa()),
            key.variable.name().to_string(),
            format!("{:.*}", METRIC_DECIMALS, bias),
            format!("{:.*}", METRIC_DECIMALS, rmse),
            stats.count.to_string(),
        ])?;
        rows += 1;
    }

    writer.flush().map_err(|e| Error::io("Cannot flush upper-air metrics", e))?;
    Ok(rows)
}
