//! Core report file decoding
//!
//! Decodes one vfld/vobs file into surface-station and upper-air level
//! records. The file role decides the data-row shape: observation rows
//! carry a station height column between the coordinates and the values,
//! forecast rows take height from a `FI` (or legacy `hgt`) column instead.

use std::path::Path;

use tracing::{debug, warn};

use super::layout::ColumnLayout;
use crate::app::models::{ReportKind, SurfaceStation, TempLevel};
use crate::constants::{LEGACY_LAYOUT_MAX_VERSION, NAMED_LAYOUT_VERSIONS};
use crate::{Error, Result};

/// Decoded content of one report file
#[derive(Debug, Clone, Default)]
pub struct DecodedReport {
    pub version: i32,
    pub stations: Vec<SurfaceStation>,
    pub levels: Vec<TempLevel>,
}

impl DecodedReport {
    /// An empty report, the recovery value for undecodable files
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Decode a report file, containing failures at single-file granularity
///
/// An unopenable path yields an empty report without comment (missing
/// files are routine in forecast archives). Malformed content yields an
/// empty report with a logged warning; partial results are discarded so a
/// half-decoded file can never bias the statistics.
pub fn decode_report(path: &Path, kind: ReportKind) -> DecodedReport {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return DecodedReport::empty(),
    };

    match parse_report(&content, kind) {
        Ok(report) => {
            debug!(
                "Decoded {}: version {}, {} stations, {} level records",
                path.display(),
                report.version,
                report.stations.len(),
                report.levels.len()
            );
            report
        }
        Err(error) => {
            warn!("Skipping report file {}: {}", path.display(), error);
            DecodedReport::empty()
        }
    }
}

/// Parse report content into typed records
///
/// Exposed within the crate so tests can exercise the grammar without
/// touching the filesystem.
pub(crate) fn parse_report(content: &str, kind: ReportKind) -> Result<DecodedReport> {
    let mut lines = content.lines();

    let (station_count, level_record_count, version) = parse_preamble(lines.next())?;

    let surface_layout = read_surface_layout(&mut lines, version)?;
    let stations = read_stations(&mut lines, station_count, &surface_layout, kind);

    let mut report = DecodedReport {
        version,
        stations,
        levels: Vec::new(),
    };

    if level_record_count > 0 {
        report.levels = read_level_block(&mut lines, level_record_count)?;
    }

    Ok(report)
}

/// Parse the `<station_count> <level_count> <version>` preamble line
fn parse_preamble(line: Option<&str>) -> Result<(usize, usize, i32)> {
    let line = line.ok_or_else(|| Error::report_format("<content>", "file is empty"))?;
    let mut tokens = line.split_whitespace();

    let mut next_int = |what: &str| -> Result<i64> {
        tokens
            .next()
            .and_then(|token| token.parse::<i64>().ok())
            .ok_or_else(|| {
                Error::report_format("<content>", format!("preamble is missing {}", what))
            })
    };

    let station_count = next_int("the station count")?;
    let level_record_count = next_int("the level record count")?;
    let version = next_int("the format version")?;

    Ok((
        station_count.max(0) as usize,
        level_record_count.max(0) as usize,
        version as i32,
    ))
}

/// Determine the surface column layout for this format version
///
/// Versions <= 3 use the fixed well-known layout (the line that would hold
/// the count is consumed and ignored); versions 4 and 5 carry an explicit
/// variable-name list. Other versions name no columns, leaving every field
/// at the missing sentinel.
fn read_surface_layout<'a, I>(lines: &mut I, version: i32) -> Result<ColumnLayout>
where
    I: Iterator<Item = &'a str>,
{
    if version <= LEGACY_LAYOUT_MAX_VERSION {
        lines.next();
        Ok(ColumnLayout::legacy_surface())
    } else if NAMED_LAYOUT_VERSIONS.contains(&version) {
        let count = parse_count(lines.next(), "surface variable count")?;
        Ok(ColumnLayout::from_names(&read_names(lines, count)))
    } else {
        Ok(ColumnLayout::empty())
    }
}

/// Parse a single-integer count line
fn parse_count(line: Option<&str>, what: &str) -> Result<usize> {
    line.and_then(|line| line.split_whitespace().next())
        .and_then(|token| token.parse::<i64>().ok())
        .map(|count| count.max(0) as usize)
        .ok_or_else(|| Error::report_format("<content>", format!("cannot parse {}", what)))
}

/// Read `count` variable-name lines, taking the first token of each
///
/// Name lines may carry a trailing accuracy figure, which is ignored.
fn read_names<'a, I>(lines: &mut I, count: usize) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(line) = lines.next() else { break };
        if let Some(token) = line.split_whitespace().next() {
            names.push(token.to_string());
        }
    }
    names
}

/// Parse the leading run of numeric tokens from a data row
fn parse_numeric_row(line: &str) -> Vec<f64> {
    line.split_whitespace()
        .map_while(|token| token.parse::<f64>().ok())
        .collect()
}

/// Read up to `station_count` surface data rows
fn read_stations<'a, I>(
    lines: &mut I,
    station_count: usize,
    layout: &ColumnLayout,
    kind: ReportKind,
) -> Vec<SurfaceStation>
where
    I: Iterator<Item = &'a str>,
{
    let mut stations = Vec::with_capacity(station_count.min(100_000));

    for _ in 0..station_count {
        let Some(line) = lines.next() else { break };
        if line.trim().is_empty() {
            break;
        }

        let tokens = parse_numeric_row(line);
        // Rows without at least id/lat/lon are skipped, not fatal
        let value_start = match kind {
            ReportKind::Forecast => 3,
            ReportKind::Observation => 4,
        };
        if tokens.len() < 3 {
            continue;
        }

        let mut station = SurfaceStation {
            id: tokens[0] as i32,
            lat: tokens[1],
            lon: tokens[2],
            ..Default::default()
        };

        let values: &[f64] = tokens.get(value_start..).unwrap_or(&[]);

        match kind {
            ReportKind::Observation => {
                if let Some(&height) = tokens.get(3) {
                    station.height = height;
                }
            }
            ReportKind::Forecast => {
                // Model orography arrives as FI, or hgt in legacy files
                let from_column = |name: &str| {
                    layout
                        .index_of(name)
                        .and_then(|index| values.get(index).copied())
                };
                if let Some(height) = from_column("FI").or_else(|| from_column("hgt")) {
                    station.height = height;
                }
            }
        }

        station.nn = layout.value(values, "NN");
        station.dd = layout.value(values, "DD");
        station.ff = layout.value(values, "FF");
        station.tt = layout.value(values, "TT");
        station.ttha = layout.value(values, "TTHA");
        station.rh = layout.value(values, "RH");
        station.ps = layout.value(values, "PS");
        // Station pressure may be named SPS or PSS depending on producer
        station.sps = if layout.has_column("SPS") {
            layout.value(values, "SPS")
        } else {
            layout.value(values, "PSS")
        };
        station.pe = layout.value(values, "PE");
        station.pe1 = layout.value(values, "PE1");
        station.pe3 = layout.value(values, "PE3");
        station.pe6 = layout.value(values, "PE6");
        station.pe12 = layout.value(values, "PE12");
        station.pe24 = layout.value(values, "PE24");
        station.qq = layout.value(values, "QQ");
        station.vi = layout.value(values, "VI");
        station.td = layout.value(values, "TD");
        station.tx = layout.value(values, "TX");
        station.tn = layout.value(values, "TN");
        station.gg = layout.value(values, "GG");
        station.gx = layout.value(values, "GX");
        station.fx = layout.value(values, "FX");
        station.ch = layout.value(values, "CH");
        station.lc = layout.value(values, "LC");

        stations.push(station);
    }

    stations
}

/// Read the upper-air block: counts, level layout, then per-station levels
///
/// A truncated block (missing count or name lines) ends decoding gracefully
/// with the levels read so far; an unparseable count is a format error.
fn read_level_block<'a, I>(lines: &mut I, level_record_count: usize) -> Result<Vec<TempLevel>>
where
    I: Iterator<Item = &'a str>,
{
    let Some(levels_line) = lines.next() else {
        return Ok(Vec::new());
    };
    if levels_line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let levels_per_station = parse_count(Some(levels_line), "level count")?;

    let Some(vars_line) = lines.next() else {
        return Ok(Vec::new());
    };
    if vars_line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let variable_count = parse_count(Some(vars_line), "level variable count")?;

    let layout = ColumnLayout::from_names(&read_names(lines, variable_count));

    let mut levels = Vec::with_capacity((level_record_count * levels_per_station).min(1_000_000));

    for _ in 0..level_record_count {
        let Some(header) = lines.next() else { break };
        if header.trim().is_empty() {
            break;
        }
        let station_id = header
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<i32>().ok());

        for _ in 0..levels_per_station {
            let Some(line) = lines.next() else { break };
            let row = parse_numeric_row(line);
            // Rows with no numeric tokens are skipped without aborting
            if row.is_empty() {
                continue;
            }
            let Some(station_id) = station_id else {
                continue;
            };

            levels.push(TempLevel {
                station_id,
                pressure: layout.value(&row, "PP"),
                temperature: layout.value(&row, "TT"),
                dewpoint: layout.value(&row, "TD"),
                geopotential: layout.value(&row, "FI"),
                rel_humidity: layout.value(&row, "RH"),
                spec_humidity: layout.value(&row, "QQ"),
                wind_dir: layout.value(&row, "DD"),
                wind_speed: layout.value(&row, "FF"),
            });
        }
    }

    Ok(levels)
}
