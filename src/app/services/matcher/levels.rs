//! Upper-air matching: composite (station, pressure) join and sampling

use std::collections::{HashMap, HashSet, hash_map::Entry};

use super::{LevelMatchPolicy, MatchContext};
use crate::app::models::TempLevel;
use crate::app::services::aggregator::{Accumulator, LevelKey, pressure_key};
use crate::app::services::variables::{Variable, directional_diff, is_missing};

/// Join key quantized at 0.01 hPa so float noise cannot break matches
fn join_key(level: &TempLevel) -> (i32, i64) {
    (level.station_id, pressure_key(level.pressure))
}

/// Score every monitored upper-air variable for every matched level
///
/// Observation levels are indexed by (station, pressure) first; each
/// forecast level probes that index once. Duplicate observation keys are
/// resolved by the configured [`LevelMatchPolicy`].
pub(crate) fn verify_levels(
    ctx: &MatchContext<'_>,
    levels: &[TempLevel],
    acc: &mut Accumulator,
) {
    if levels.is_empty() || ctx.observations.levels.is_empty() {
        return;
    }

    let mut lookup: HashMap<(i32, i64), &TempLevel> = HashMap::new();
    let mut duplicated: HashSet<(i32, i64)> = HashSet::new();
    for observed in &ctx.observations.levels {
        match lookup.entry(join_key(observed)) {
            Entry::Vacant(slot) => {
                slot.insert(observed);
            }
            Entry::Occupied(slot) => {
                duplicated.insert(*slot.key());
            }
        }
    }

    for forecast in levels {
        let key = join_key(forecast);
        if ctx.level_policy == LevelMatchPolicy::RejectDuplicates && duplicated.contains(&key) {
            continue;
        }
        let Some(observed) = lookup.get(&key) else {
            continue;
        };

        for &variable in ctx.upper_air_variables {
            let forecast_value = variable.level_value(forecast);
            let observed_value = variable.level_value(observed);
            if is_missing(forecast_value) || is_missing(observed_value) {
                continue;
            }

            let error = if variable.is_wind_direction() {
                directional_diff(forecast_value, observed_value)
            } else {
                forecast_value - observed_value
            };
            if is_missing(error) {
                continue;
            }

            acc.add_level(sample_key(ctx, variable, key.1), error);
        }
    }
}

fn sample_key(ctx: &MatchContext<'_>, variable: Variable, pressure_key: i64) -> LevelKey {
    LevelKey {
        experiment: ctx.info.experiment.clone(),
        lead_time: ctx.info.lead_time,
        valid_time: ctx.info.valid_time,
        variable,
        pressure_key,
    }
}
