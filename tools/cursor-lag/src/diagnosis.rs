//! Rule-based diagnosis of a lag distribution.

use serde::Serialize;

use crate::config::Config;
use crate::stats::LagStats;
use crate::types::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Ok,
  Warning,
  Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
  pub level: Level,
  pub message: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub hints: Vec<String>,
}

impl Finding {
  fn new(level: Level, message: impl Into<String>) -> Self {
    Self {
      level,
      message: message.into(),
      hints: Vec::new(),
    }
  }

  fn hint(mut self, hint: impl Into<String>) -> Self {
    self.hints.push(hint.into());
    self
  }
}

/// Evaluate the fixed rules, in report order.
///
/// `mismatched` is the number of sequence ids whose beats disagreed.
pub fn diagnose(stats: &LagStats, strategy: Strategy, mismatched: usize, config: &Config) -> Vec<Finding> {
  let mut findings = Vec::new();
  let h = &stats.histogram;

  if h.negative > 0 {
    let finding = Finding::new(Level::Critical, format!("{} negative lags detected", h.negative));
    findings.push(match strategy {
      Strategy::Window => finding
        .hint("Likely cause: render paired with the wrong dispatch without sequence numbers")
        .hint("Add Seq=<n> to both dispatch and render log lines"),
      Strategy::Sequence => finding.hint("Should not happen with sequence numbers; check the logging clocks"),
    });
  }

  let reference = stats.reference_mean;
  findings.push(if reference < config.good_below_ms as f64 {
    Finding::new(Level::Ok, "Average performance is good")
  } else if reference < config.acceptable_below_ms as f64 {
    Finding::new(Level::Warning, "Noticeable lag exists; consider optimizations")
  } else {
    Finding::new(Level::Critical, "Significant lag detected; immediate action needed")
  });

  let poor = h.fraction(h.poor);
  if poor > config.poor_fraction_limit {
    findings.push(
      Finding::new(
        Level::Critical,
        format!(
          "{:.1}% of updates have >={}ms lag",
          poor * 100.0,
          config.acceptable_below_ms
        ),
      )
      .hint("This is very noticeable to users"),
    );
  }

  if h.fraction(h.excellent) < config.excellent_fraction_floor {
    findings.push(
      Finding::new(
        Level::Warning,
        format!(
          "Less than {:.0}% of updates are frame-perfect (<{}ms)",
          config.excellent_fraction_floor * 100.0,
          config.excellent_below_ms
        ),
      )
      .hint("A chain of deferred state updates between dispatch and render is the usual cause")
      .hint("Render directly from the dispatched beat in a single update"),
    );
  }

  if mismatched > 0 {
    findings.push(
      Finding::new(
        Level::Warning,
        format!("{} sequence ids paired renders showing a different beat", mismatched),
      )
      .hint("Sequence counters on the dispatch and render side may have drifted"),
    );
  }

  findings
}
