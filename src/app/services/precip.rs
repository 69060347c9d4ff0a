//! Cumulative-precipitation prepass and window differencing
//!
//! Forecast files carry precipitation as a running total since forecast
//! start. Before verification, every selected forecast file is decoded
//! once to index those totals per (experiment, base time) by lead time and
//! station; during matching, the difference between totals at lead `L` and
//! `L - w` yields the forecast's `w`-hour accumulation.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::info;

use crate::Result;
use crate::app::models::{FileInfo, ReportKind};
use crate::app::services::report_decoder::decode_report;
use crate::app::services::variables::{Variable, is_missing};

/// One evaluated precipitation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecipWindow {
    /// The accumulation variable the window scores against (e.g. PE3)
    pub variable: Variable,
    /// Window length in hours
    pub hours: i32,
}

/// Cumulative totals of one forecast cycle, by lead time and station
#[derive(Debug, Default)]
pub struct CycleTotals {
    by_lead: BTreeMap<i32, HashMap<i32, f64>>,
}

impl CycleTotals {
    /// The forecast accumulation over `[lead - window, lead]` for a station
    ///
    /// `None` when either endpoint's total is absent; the caller treats a
    /// negative difference as a suppressed sample, not an error.
    pub fn window_increment(&self, lead_time: i32, window: i32, station: i32) -> Option<f64> {
        if lead_time < window {
            return None;
        }
        let current = self.by_lead.get(&lead_time)?.get(&station)?;
        let previous = self.by_lead.get(&(lead_time - window))?.get(&station)?;
        Some(current - previous)
    }
}

/// Cumulative forecast precipitation for every (experiment, base time)
#[derive(Debug, Default)]
pub struct PrecipIndex {
    cycles: HashMap<(String, i64), CycleTotals>,
}

impl PrecipIndex {
    /// Record the cumulative total for one station at one lead time
    pub(crate) fn insert(
        &mut self,
        experiment: &str,
        base_time: i64,
        lead_time: i32,
        station: i32,
        total: f64,
    ) {
        self.cycles
            .entry((experiment.to_string(), base_time))
            .or_default()
            .by_lead
            .entry(lead_time)
            .or_default()
            .insert(station, total);
    }

    /// Totals for one forecast cycle, if any were indexed
    pub fn cycle(&self, experiment: &str, base_time: i64) -> Option<&CycleTotals> {
        self.cycles.get(&(experiment.to_string(), base_time))
    }

    /// Number of indexed forecast cycles
    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }
}

/// Decode all forecast files once and index their cumulative totals
///
/// Parallel per file with a serialized merge, mirroring the observation
/// index build. Missing totals are simply not stored.
pub async fn build_precip_index(files: &[FileInfo], workers: usize) -> Result<Arc<PrecipIndex>> {
    info!(
        "Precomputing cumulative precipitation totals from {} forecast files",
        files.len()
    );

    let queue = Arc::new(Mutex::new(
        files.iter().cloned().collect::<VecDeque<FileInfo>>(),
    ));
    let mut tasks: JoinSet<Vec<(FileInfo, Vec<(i32, f64)>)>> = JoinSet::new();

    for _ in 0..workers.max(1) {
        let queue = queue.clone();
        tasks.spawn(async move {
            let mut parsed = Vec::new();
            loop {
                let next = queue.lock().await.pop_front();
                let Some(info) = next else { break };
                let report = decode_report(&info.path, ReportKind::Forecast);
                let totals: Vec<(i32, f64)> = report
                    .stations
                    .iter()
                    .filter(|station| !is_missing(station.pe))
                    .map(|station| (station.id, station.pe))
                    .collect();
                parsed.push((info, totals));
            }
            parsed
        });
    }

    let mut index = PrecipIndex::default();
    while let Some(result) = tasks.join_next().await {
        for (info, totals) in result? {
            for (station, total) in totals {
                index.insert(
                    &info.experiment,
                    info.base_time,
                    info.lead_time,
                    station,
                    total,
                );
            }
        }
    }

    Ok(Arc::new(index))
}
