//! Tests for upper-air level matching and duplicate-key policies

use super::{ContextFixture, observations_with, temp_level};
use crate::app::services::aggregator::{Accumulator, LevelKey, pressure_key};
use crate::app::services::matcher::{LevelMatchPolicy, verify_report};
use crate::app::services::report_decoder::DecodedReport;
use crate::app::services::variables::Variable;

fn key_for(fixture: &ContextFixture, variable: Variable, pressure: f64) -> LevelKey {
    LevelKey {
        experiment: fixture.info.experiment.clone(),
        lead_time: fixture.info.lead_time,
        valid_time: fixture.info.valid_time,
        variable,
        pressure_key: pressure_key(pressure),
    }
}

fn level_report(levels: Vec<crate::app::models::TempLevel>) -> DecodedReport {
    DecodedReport {
        version: 4,
        stations: Vec::new(),
        levels,
    }
}

#[test]
fn test_level_match_on_station_and_pressure() {
    let mut observed = temp_level(2001, 850.0);
    observed.temperature = -4.0;
    let fixture = ContextFixture::new(observations_with(Vec::new(), vec![observed]));

    let mut forecast = temp_level(2001, 850.0);
    forecast.temperature = -5.0;

    let mut acc = Accumulator::new();
    verify_report(&fixture.context(), &level_report(vec![forecast]), &mut acc);

    let stats = &acc.levels[&key_for(&fixture, Variable::Tt, 850.0)];
    assert_eq!(stats.count, 1);
    assert!((stats.sum_of_errors - (-1.0)).abs() < 1e-12);
}

#[test]
fn test_level_pressure_noise_within_key_resolution() {
    let mut observed = temp_level(2001, 850.0000001);
    observed.temperature = -4.0;
    let fixture = ContextFixture::new(observations_with(Vec::new(), vec![observed]));

    let mut forecast = temp_level(2001, 850.0);
    forecast.temperature = -5.0;

    let mut acc = Accumulator::new();
    verify_report(&fixture.context(), &level_report(vec![forecast]), &mut acc);
    assert_eq!(acc.levels.len(), 1);
}

#[test]
fn test_level_mismatched_pressure_contributes_nothing() {
    let mut observed = temp_level(2001, 925.0);
    observed.temperature = -4.0;
    let fixture = ContextFixture::new(observations_with(Vec::new(), vec![observed]));

    let mut forecast = temp_level(2001, 850.0);
    forecast.temperature = -5.0;

    let mut acc = Accumulator::new();
    verify_report(&fixture.context(), &level_report(vec![forecast]), &mut acc);
    assert!(acc.levels.is_empty());
}

#[test]
fn test_level_variables_gated_independently() {
    let mut observed = temp_level(2001, 850.0);
    observed.temperature = -4.0;
    observed.wind_speed = -999.0;
    observed.wind_dir = 10.0;
    let mut fixture = ContextFixture::new(observations_with(Vec::new(), vec![observed]));
    fixture.upper_air_variables = vec![Variable::Tt, Variable::Ff, Variable::Dd];

    let mut forecast = temp_level(2001, 850.0);
    forecast.temperature = -5.0;
    forecast.wind_speed = 20.0;
    forecast.wind_dir = 350.0;

    let mut acc = Accumulator::new();
    verify_report(&fixture.context(), &level_report(vec![forecast]), &mut acc);

    // FF missing on the observation side, TT and DD sampled
    assert_eq!(acc.levels.len(), 2);
    let dd = &acc.levels[&key_for(&fixture, Variable::Dd, 850.0)];
    assert!((dd.sum_of_errors - (-20.0)).abs() < 1e-12);
}

#[test]
fn test_duplicate_keys_first_match_wins() {
    let mut first = temp_level(2001, 850.0);
    first.temperature = -4.0;
    let mut second = temp_level(2001, 850.0);
    second.temperature = -10.0;
    let fixture = ContextFixture::new(observations_with(Vec::new(), vec![first, second]));

    let mut forecast = temp_level(2001, 850.0);
    forecast.temperature = -5.0;

    let mut acc = Accumulator::new();
    verify_report(&fixture.context(), &level_report(vec![forecast]), &mut acc);

    // Scored against the first observation level only
    let stats = &acc.levels[&key_for(&fixture, Variable::Tt, 850.0)];
    assert_eq!(stats.count, 1);
    assert!((stats.sum_of_errors - (-1.0)).abs() < 1e-12);
}

#[test]
fn test_duplicate_keys_rejected_under_strict_policy() {
    let mut first = temp_level(2001, 850.0);
    first.temperature = -4.0;
    let mut second = temp_level(2001, 850.0);
    second.temperature = -10.0;
    let mut unique = temp_level(2001, 925.0);
    unique.temperature = 2.0;
    let mut fixture =
        ContextFixture::new(observations_with(Vec::new(), vec![first, second, unique]));
    fixture.level_policy = LevelMatchPolicy::RejectDuplicates;

    let mut ambiguous = temp_level(2001, 850.0);
    ambiguous.temperature = -5.0;
    let mut clean = temp_level(2001, 925.0);
    clean.temperature = 3.0;

    let mut acc = Accumulator::new();
    verify_report(
        &fixture.context(),
        &level_report(vec![ambiguous, clean]),
        &mut acc,
    );

    // Only the unambiguous 925 hPa level is scored
    assert_eq!(acc.levels.len(), 1);
    let stats = &acc.levels[&key_for(&fixture, Variable::Tt, 925.0)];
    assert!((stats.sum_of_errors - 1.0).abs() < 1e-12);
}

#[test]
fn test_same_pressure_different_stations_are_distinct() {
    let mut station_a = temp_level(2001, 850.0);
    station_a.temperature = -4.0;
    let mut station_b = temp_level(2002, 850.0);
    station_b.temperature = 0.0;
    let fixture = ContextFixture::new(observations_with(Vec::new(), vec![station_a, station_b]));

    let mut forecast = temp_level(2002, 850.0);
    forecast.temperature = 1.0;

    let mut acc = Accumulator::new();
    verify_report(&fixture.context(), &level_report(vec![forecast]), &mut acc);

    let stats = &acc.levels[&key_for(&fixture, Variable::Tt, 850.0)];
    assert_eq!(stats.count, 1);
    assert!((stats.sum_of_errors - 1.0).abs() < 1e-12);
}
