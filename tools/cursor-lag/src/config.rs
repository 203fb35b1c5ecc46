//! Analyzer configuration with sane defaults.

use crate::error::AnalysisError;

/// Tunable thresholds for matching, bucketing and diagnosis.
#[derive(Debug, Clone)]
pub struct Config {
  /// Max delay (ms) between a dispatch and the render that satisfies it.
  pub max_time_window_ms: i64,
  /// Score penalty (ms) per unit of beat difference in window matching.
  pub beat_mismatch_penalty_per_unit: f64,
  /// Max absolute beat difference for a sequence-keyed pair to be accepted.
  pub beat_tolerance: f64,
  /// Upper bound (exclusive) of the "excellent" bucket: one frame at 60 Hz.
  pub excellent_below_ms: i64,
  /// Upper bound (exclusive) of the "good" bucket.
  pub good_below_ms: i64,
  /// Upper bound (exclusive) of the "acceptable" bucket; anything at or above is poor.
  pub acceptable_below_ms: i64,
  /// Fraction of poor updates above which the diagnosis flags visible lag.
  pub poor_fraction_limit: f64,
  /// Fraction of excellent updates below which the diagnosis flags missed frames.
  pub excellent_fraction_floor: f64,
  /// Length of worst/best/negative lists in the report.
  pub report_limit: usize,
  /// Unmatched dispatches listed in the report before truncating.
  pub unmatched_sample: usize,
  /// Raw events dumped when no pair could be formed.
  pub debug_sample: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      max_time_window_ms: 200,
      beat_mismatch_penalty_per_unit: 50.0,
      beat_tolerance: 0.01,
      excellent_below_ms: 16,
      good_below_ms: 50,
      acceptable_below_ms: 100,
      poor_fraction_limit: 0.1,
      excellent_fraction_floor: 0.5,
      report_limit: 10,
      unmatched_sample: 5,
      debug_sample: 5,
    }
  }
}

impl Config {
  /// Reject settings the matchers cannot work with.
  pub fn validate(&self) -> Result<(), AnalysisError> {
    if self.max_time_window_ms <= 0 {
      return Err(AnalysisError::config("max_time_window_ms", "must be positive"));
    }
    if !(self.beat_mismatch_penalty_per_unit >= 0.0) {
      return Err(AnalysisError::config(
        "beat_mismatch_penalty_per_unit",
        "must be a non-negative number",
      ));
    }
    if !(self.beat_tolerance > 0.0) {
      return Err(AnalysisError::config("beat_tolerance", "must be positive"));
    }
    if !(self.excellent_below_ms <= self.good_below_ms && self.good_below_ms <= self.acceptable_below_ms) {
      return Err(AnalysisError::config("bucket thresholds", "must be ascending"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    assert!(Config::default().validate().is_ok());
  }

  #[test]
  fn zero_window_rejected() {
    let config = Config {
      max_time_window_ms: 0,
      ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("max_time_window_ms"));
  }

  #[test]
  fn nan_penalty_rejected() {
    let config = Config {
      beat_mismatch_penalty_per_unit: f64::NAN,
      ..Config::default()
    };
    assert!(config.validate().is_err());
  }

  #[test]
  fn descending_buckets_rejected() {
    let config = Config {
      good_below_ms: 10,
      ..Config::default()
    };
    assert!(config.validate().is_err());
  }
}
