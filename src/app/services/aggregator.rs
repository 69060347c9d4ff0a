//! Error-statistics aggregation
//!
//! Accumulates (sum of errors, sum of squared errors, count) per
//! aggregation key. Workers accumulate into private maps and merge them
//! into the global result once per worker; merging is commutative and
//! associative by construction, so the outcome is independent of worker
//! scheduling up to floating-point summation-order rounding.

use std::collections::BTreeMap;

use crate::app::services::variables::Variable;
use crate::constants::PRESSURE_KEY_SCALE;

/// Aggregation key for surface samples
///
/// Field order is the total order used for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SurfaceKey {
    pub experiment: String,
    pub lead_time: i32,
    pub valid_time: i64,
    pub variable: Variable,
}

/// Aggregation key for upper-air samples
///
/// Pressure is keyed at 0.01 hPa resolution so that floating-point noise
/// in reported levels cannot split a bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LevelKey {
    pub experiment: String,
    pub lead_time: i32,
    pub valid_time: i64,
    pub variable: Variable,
    pub pressure_key: i64,
}

/// Quantize a pressure in hPa to its aggregation key component
pub fn pressure_key(pressure: f64) -> i64 {
    (pressure * PRESSURE_KEY_SCALE).round() as i64
}

impl LevelKey {
    /// The pressure level this key represents, in hPa
    pub fn pressure_hpa(&self) -> f64 {
        self.pressure_key as f64 / PRESSURE_KEY_SCALE
    }
}

/// Running error statistics for one aggregation key
///
/// All fields are monotonically non-decreasing during accumulation and are
/// never reset once the bucket exists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregatedStats {
    pub sum_of_errors: f64,
    pub sum_of_squared_errors: f64,
    pub count: u64,
}

impl AggregatedStats {
    /// Add one error sample
    pub fn accumulate(&mut self, error: f64) {
        self.sum_of_errors += error;
        self.sum_of_squared_errors += error * error;
        self.count += 1;
    }

    /// Fold another bucket into this one
    pub fn merge(&mut self, other: &AggregatedStats) {
        self.sum_of_errors += other.sum_of_errors;
        self.sum_of_squared_errors += other.sum_of_squared_errors;
        self.count += other.count;
    }

    /// Derive (bias, rmse); defined only for non-empty buckets
    pub fn finalize(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let bias = self.sum_of_errors / n;
        let rmse = (self.sum_of_squared_errors / n).sqrt();
        Some((bias, rmse))
    }
}

/// A set of surface and upper-air buckets
///
/// Each verification worker owns one; the driver merges worker
/// accumulators into a global one after each worker's file pass ends.
#[derive(Debug, Default)]
pub struct Accumulator {
    pub surface: BTreeMap<SurfaceKey, AggregatedStats>,
    pub levels: BTreeMap<LevelKey, AggregatedStats>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one surface error sample, creating the bucket on first use
    pub fn add_surface(&mut self, key: SurfaceKey, error: f64) {
        self.surface.entry(key).or_default().accumulate(error);
    }

    /// Add one upper-air error sample, creating the bucket on first use
    pub fn add_level(&mut self, key: LevelKey, error: f64) {
        self.levels.entry(key).or_default().accumulate(error);
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: Accumulator) {
        for (key, stats) in other.surface {
            self.surface.entry(key).or_default().merge(&stats);
        }
        for (key, stats) in other.levels {
            self.levels.entry(key).or_default().merge(&stats);
        }
    }

    /// Total number of samples across all buckets
    pub fn sample_count(&self) -> u64 {
        self.surface.values().map(|stats| stats.count).sum::<u64>()
            + self.levels.values().map(|stats| stats.count).sum::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_key(variable: Variable) -> SurfaceKey {
        SurfaceKey {
            experiment: "test".to_string(),
            lead_time: 6,
            valid_time: 2023061506,
            variable,
        }
    }

    #[test]
    fn test_accumulate_and_finalize() {
        let mut stats = AggregatedStats::default();
        stats.accumulate(1.0);
        stats.accumulate(-1.0);
        stats.accumulate(2.0);

        assert_eq!(stats.count, 3);
        let (bias, rmse) = stats.finalize().unwrap();
        assert!((bias - 2.0 / 3.0).abs() < 1e-12);
        assert!((rmse - (6.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_bucket_has_no_metrics() {
        assert_eq!(AggregatedStats::default().finalize(), None);
    }

    #[test]
    fn test_merge_is_associative_within_tolerance() {
        let errors = [0.5, -1.25, 3.0, 0.125, -0.75, 2.5];

        // All samples into one bucket
        let mut whole = AggregatedStats::default();
        for &error in &errors {
            whole.accumulate(error);
        }

        // Split across three partials, merged in two different orders
        let mut parts: Vec<AggregatedStats> = errors
            .chunks(2)
            .map(|chunk| {
                let mut stats = AggregatedStats::default();
                for &error in chunk {
                    stats.accumulate(error);
                }
                stats
            })
            .collect();

        let mut forward = AggregatedStats::default();
        for part in &parts {
            forward.merge(part);
        }

        parts.reverse();
        let mut backward = AggregatedStats::default();
        for part in &parts {
            backward.merge(part);
        }

        let (whole_bias, whole_rmse) = whole.finalize().unwrap();
        for merged in [forward, backward] {
            let (bias, rmse) = merged.finalize().unwrap();
            assert_eq!(merged.count, whole.count);
            assert!((bias - whole_bias).abs() < 1e-12);
            assert!((rmse - whole_rmse).abs() < 1e-12);
        }
    }

    #[test]
    fn test_accumulator_merge_creates_and_folds_buckets() {
        let mut local_a = Accumulator::new();
        local_a.add_surface(surface_key(Variable::Tt), 1.0);
        local_a.add_surface(surface_key(Variable::Ff), 0.5);

        let mut local_b = Accumulator::new();
        local_b.add_surface(surface_key(Variable::Tt), 3.0);

        let mut global = Accumulator::new();
        global.merge(local_a);
        global.merge(local_b);

        let tt = &global.surface[&surface_key(Variable::Tt)];
        assert_eq!(tt.count, 2);
        assert!((tt.sum_of_errors - 4.0).abs() < 1e-12);

        let ff = &global.surface[&surface_key(Variable::Ff)];
        assert_eq!(ff.count, 1);
        assert_eq!(global.sample_count(), 3);
    }

    #[test]
    fn test_pressure_key_tolerates_float_noise() {
        assert_eq!(pressure_key(850.0), pressure_key(850.0000001));
        assert_eq!(pressure_key(850.0), 85000);
        assert_ne!(pressure_key(850.0), pressure_key(850.02));
    }

    #[test]
    fn test_key_ordering_is_total() {
        let mut keys = vec![
            surface_key(Variable::Tt),
            SurfaceKey {
                experiment: "aaa".to_string(),
                ..surface_key(Variable::Tt)
            },
            SurfaceKey {
                lead_time: 3,
                ..surface_key(Variable::Dd)
            },
        ];
        keys.sort();
        assert_eq!(keys[0].experiment, "aaa");
        assert_eq!(keys[1].lead_time, 3);
    }

    #[test]
    fn test_level_key_pressure_round_trip() {
        let key = LevelKey {
            experiment: "test".to_string(),
            lead_time: 12,
            valid_time: 2023061512,
            variable: Variable::Tt,
            pressure_key: pressure_key(925.0),
        };
        assert!((key.pressure_hpa() - 925.0).abs() < 1e-9);
    }
}
