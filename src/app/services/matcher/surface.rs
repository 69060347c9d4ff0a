//! Surface matching: station-id join, scalar variables, precipitation
//! windows

use tracing::trace;

use super::MatchContext;
use crate::app::models::SurfaceStation;
use crate::app::services::aggregator::{Accumulator, SurfaceKey};
use crate::app::services::variables::{Variable, directional_diff, is_missing};

/// Score every monitored surface variable for every matched station
///
/// A sample is admitted only when both the forecast and observation values
/// pass the missing check; everything else silently contributes nothing.
pub(crate) fn verify_surface(
    ctx: &MatchContext<'_>,
    stations: &[SurfaceStation],
    acc: &mut Accumulator,
) {
    let cycle = ctx.precip.cycle(&ctx.info.experiment, ctx.info.base_time);
    let mut matched = 0usize;

    for forecast in stations {
        let Some(observed) = ctx.observations.stations.get(&forecast.id) else {
            continue;
        };
        matched += 1;

        for &variable in ctx.surface_variables {
            let forecast_value = variable.surface_value(forecast);
            let observed_value = variable.surface_value(observed);
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

            acc.add_surface(sample_key(ctx, variable), error);
        }

        // Windowed precipitation: finite differences of the cumulative
        // totals scored against the observed accumulation for that window
        let Some(cycle) = cycle else { continue };
        for window in ctx.precip_windows {
            let Some(increment) =
                cycle.window_increment(ctx.info.lead_time, window.hours, forecast.id)
            else {
                continue;
            };
            if increment < 0.0 {
                continue;
            }
            let observed_value = window.variable.surface_value(observed);
            if is_missing(observed_value) {
                continue;
            }

            acc.add_surface(sample_key(ctx, window.variable), increment - observed_value);
        }
    }

    trace!(
        "Surface pass for {}: {} of {} forecast stations matched",
        ctx.info.path.display(),
        matched,
        stations.len()
    );
}

fn sample_key(ctx: &MatchContext<'_>, variable: Variable) -> SurfaceKey {
    SurfaceKey {
        experiment: ctx.info.experiment.clone(),
        lead_time: ctx.info.lead_time,
        valid_time: ctx.info.valid_time,
        variable,
    }
}
