//! Structured error types for the lag analyzer.
//!
//! `EmptyStream` and `NoMatches` end the analysis path but are reported to the
//! user as regular output; only `InputUnavailable` is a failed run.

use std::io;

use thiserror::Error;

use crate::types::{DispatchEvent, RenderEvent, Strategy};

#[derive(Debug, Error)]
pub enum AnalysisError {
  #[error("input: cannot read {path}: {source}")]
  InputUnavailable {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("no events found: {dispatches} dispatch, {renders} render")]
  EmptyStream { dispatches: usize, renders: usize },

  #[error("no matching dispatch-render pairs found ({strategy} matching)")]
  NoMatches {
    strategy: Strategy,
    dispatch_sample: Vec<DispatchEvent>,
    render_sample: Vec<RenderEvent>,
  },

  #[error("grammar: {field}: {reason}")]
  Grammar { field: String, reason: String },

  #[error("config: {field}: {reason}")]
  Config { field: String, reason: String },

  #[error("regex: {0}")]
  Regex(#[from] regex::Error),
}

impl AnalysisError {
  pub fn input(path: impl Into<String>, source: io::Error) -> Self {
    Self::InputUnavailable {
      path: path.into(),
      source,
    }
  }

  pub fn grammar(field: &str, reason: &str) -> Self {
    Self::Grammar {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn config(field: &str, reason: &str) -> Self {
    Self::Config {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  /// True for conditions that end the analysis but still belong in the report.
  pub fn is_reportable(&self) -> bool {
    matches!(self, Self::EmptyStream { .. } | Self::NoMatches { .. })
  }
}
