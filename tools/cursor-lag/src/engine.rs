//! Analyzer: extraction -> correlation -> statistics -> diagnosis.

use tracing::info;

use crate::config::Config;
use crate::correlation;
use crate::diagnosis;
use crate::error::AnalysisError;
use crate::extract::{self, EventGrammar};
use crate::report::Report;
use crate::stats::LagStats;

/// One-shot lag analyzer. Holds configuration only; every call is independent.
#[derive(Debug, Clone)]
pub struct Analyzer {
  config: Config,
  grammar: EventGrammar,
}

impl Analyzer {
  pub fn new(config: Config) -> Result<Self, AnalysisError> {
    config.validate()?;
    Ok(Self {
      config,
      grammar: EventGrammar::default(),
    })
  }

  pub fn with_defaults() -> Self {
    Self {
      config: Config::default(),
      grammar: EventGrammar::default(),
    }
  }

  /// Replace the default dispatch/render grammar.
  pub fn with_grammar(mut self, grammar: EventGrammar) -> Self {
    self.grammar = grammar;
    self
  }

  /// Analyze a complete log.
  ///
  /// `EmptyStream` and `NoMatches` end the analysis early; callers report them
  /// as regular output.
  pub fn analyze(&self, text: &str) -> Result<Report, AnalysisError> {
    let events = extract::extract(text, &self.grammar)?;
    let outcome = correlation::correlate(&events, &self.config)?;
    let stats = LagStats::compute(&outcome, &self.config)?;
    let findings = diagnosis::diagnose(&stats, outcome.strategy, outcome.mismatched.len(), &self.config);

    info!(
      strategy = %outcome.strategy,
      pairs = stats.count,
      unmatched = outcome.unmatched.len(),
      mean_ms = stats.mean,
      "analysis complete"
    );

    Ok(Report {
      run_id: run_id(text),
      dispatch_count: events.dispatches.len(),
      render_count: events.renders.len(),
      config: self.config.clone(),
      outcome,
      stats,
      findings,
    })
  }
}

/// Stable run ID: hash of the raw input, so repeated runs over one log agree.
pub fn run_id(text: &str) -> String {
  let hex = blake3::hash(text.as_bytes()).to_hex();
  format!("lag-{}", &hex[..16])
}
