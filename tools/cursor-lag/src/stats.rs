//! Lag statistics over matched pairs: summary numbers, performance buckets,
//! worst/best lists and negative-lag anomalies.

use serde::Serialize;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::types::{MatchOutcome, MatchedPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
  Excellent,
  Good,
  Acceptable,
  Poor,
}

impl Bucket {
  /// Bucket a lag by numeric value; negative lags land in `Excellent`.
  pub fn classify(lag_ms: i64, config: &Config) -> Self {
    if lag_ms < config.excellent_below_ms {
      Self::Excellent
    } else if lag_ms < config.good_below_ms {
      Self::Good
    } else if lag_ms < config.acceptable_below_ms {
      Self::Acceptable
    } else {
      Self::Poor
    }
  }
}

/// Bucket counts. `negative` is tracked on top of the four buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
  pub excellent: usize,
  pub good: usize,
  pub acceptable: usize,
  pub poor: usize,
  pub negative: usize,
}

impl Histogram {
  pub fn record(&mut self, lag_ms: i64, config: &Config) {
    match Bucket::classify(lag_ms, config) {
      Bucket::Excellent => self.excellent += 1,
      Bucket::Good => self.good += 1,
      Bucket::Acceptable => self.acceptable += 1,
      Bucket::Poor => self.poor += 1,
    }
    if lag_ms < 0 {
      self.negative += 1;
    }
  }

  /// Sum of the four buckets (excludes `negative`).
  pub fn total(&self) -> usize {
    self.excellent + self.good + self.acceptable + self.poor
  }

  pub fn fraction(&self, count: usize) -> f64 {
    match self.total() {
      0 => 0.0,
      total => count as f64 / total as f64,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagStats {
  pub count: usize,
  pub min: i64,
  pub max: i64,
  pub mean: f64,
  pub median: f64,
  /// Mean of non-negative lags, or of all lags when every lag is negative.
  pub reference_mean: f64,
  pub histogram: Histogram,
  /// Highest non-negative lags first.
  pub worst: Vec<MatchedPair>,
  /// Lowest non-negative lags first.
  pub best: Vec<MatchedPair>,
  /// Most negative first.
  pub negatives: Vec<MatchedPair>,
}

impl LagStats {
  /// Statistics for one matcher run. `NoMatches` when no pair was formed.
  pub fn compute(outcome: &MatchOutcome, config: &Config) -> Result<Self, AnalysisError> {
    Self::from_pairs(&outcome.pairs, config).ok_or(AnalysisError::NoMatches {
      strategy: outcome.strategy,
      dispatch_sample: Vec::new(),
      render_sample: Vec::new(),
    })
  }

  /// `None` for an empty pair list.
  pub fn from_pairs(pairs: &[MatchedPair], config: &Config) -> Option<Self> {
    if pairs.is_empty() {
      return None;
    }

    let mut lags: Vec<i64> = pairs.iter().map(|p| p.lag_ms).collect();
    lags.sort_unstable();
    let count = lags.len();
    let min = lags[0];
    let max = lags[count - 1];
    let mean = average(&lags);
    let median = if count % 2 == 1 {
      lags[count / 2] as f64
    } else {
      (lags[count / 2 - 1] as f64 + lags[count / 2] as f64) / 2.0
    };

    let non_negative: Vec<i64> = lags.iter().copied().filter(|l| *l >= 0).collect();
    let reference_mean = if non_negative.is_empty() {
      mean
    } else {
      average(&non_negative)
    };

    let mut histogram = Histogram::default();
    for &lag in &lags {
      histogram.record(lag, config);
    }

    // Negative lags are anomalies, listed only in `negatives`. Stable sorts
    // keep input order among equal lags.
    let causal: Vec<MatchedPair> = pairs.iter().filter(|p| !p.is_negative()).cloned().collect();
    let mut worst = causal.clone();
    worst.sort_by(|a, b| b.lag_ms.cmp(&a.lag_ms));
    worst.truncate(config.report_limit);

    let mut best = causal;
    best.sort_by_key(|p| p.lag_ms);
    best.truncate(config.report_limit);

    let mut negatives: Vec<MatchedPair> = pairs.iter().filter(|p| p.is_negative()).cloned().collect();
    negatives.sort_by_key(|p| p.lag_ms);
    negatives.truncate(config.report_limit);

    Some(Self {
      count,
      min,
      max,
      mean,
      median,
      reference_mean,
      histogram,
      worst,
      best,
      negatives,
    })
  }
}

fn average(values: &[i64]) -> f64 {
  values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}
