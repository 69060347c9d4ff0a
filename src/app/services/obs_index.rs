//! Two-phase observation index construction
//!
//! Observation files are parsed in parallel (phase one), with each file's
//! stations and levels merged into the shared per-valid-time bucket as its
//! worker hands them back (phase two, serialized in the driver task).
//! Awaiting every worker is the barrier after which the index is frozen
//! behind an `Arc` and shared read-only with the verification workers.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::app::models::{FileInfo, ObservationBucket, ObservationIndex, ReportKind};
use crate::app::services::report_decoder::decode_report;
use crate::Result;

/// Parsed content of one observation file, tagged with its valid time
type ParsedObservation = (i64, crate::app::services::report_decoder::DecodedReport);

/// Build the observation lookup table from all discovered observation files
///
/// Parsing runs on up to `workers` concurrent tasks; merging happens
/// serially as results arrive, so bucket insertion never contends with
/// parsing. Duplicate station ids for the same valid time resolve
/// last-write-wins; level records accumulate.
pub async fn build_observation_index(
    files: Vec<FileInfo>,
    workers: usize,
) -> Result<Arc<ObservationIndex>> {
    info!(
        "Reading {} observation files into memory with {} workers",
        files.len(),
        workers.max(1)
    );

    let queue = Arc::new(Mutex::new(files.into_iter().collect::<VecDeque<_>>()));
    let mut tasks: JoinSet<Vec<ParsedObservation>> = JoinSet::new();

    for _ in 0..workers.max(1) {
        let queue = queue.clone();
        tasks.spawn(async move {
            let mut parsed = Vec::new();
            loop {
                let next = queue.lock().await.pop_front();
                let Some(info) = next else { break };
                let report = decode_report(&info.path, ReportKind::Observation);
                parsed.push((info.valid_time, report));
            }
            parsed
        });
    }

    let mut index = ObservationIndex::new();
    while let Some(result) = tasks.join_next().await {
        for (valid_time, report) in result? {
            let bucket: &mut ObservationBucket = index.entry(valid_time).or_default();
            for station in report.stations {
                bucket.stations.insert(station.id, station);
            }
            bucket.levels.extend(report.levels);
        }
    }

    debug!("Observation index covers {} valid times", index.len());
    Ok(Arc::new(index))
}
