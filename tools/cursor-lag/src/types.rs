//! Core types for the lag analyzer (extracted events + matcher output).

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Extracted events
// ---------------------------------------------------------------------------

/// A "beat update dispatched" record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchEvent {
  pub beat: f64,
  /// Audio clock position (seconds) the dispatch was computed for.
  pub source_time: f64,
  /// Monotonic timestamp (ms) at which the update was issued.
  pub dispatch_time: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sequence: Option<u64>,
}

/// A "cursor rendered at beat" record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEvent {
  pub beat: f64,
  /// Monotonic timestamp (ms) at which the update became visible.
  pub render_time: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sequence: Option<u64>,
}

/// Both event streams in source-text order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedEvents {
  pub dispatches: Vec<DispatchEvent>,
  pub renders: Vec<RenderEvent>,
}

impl ExtractedEvents {
  /// Sequence matching applies once any dispatch carries an id.
  pub fn has_sequence_ids(&self) -> bool {
    self.dispatches.iter().any(|d| d.sequence.is_some())
  }
}

// ---------------------------------------------------------------------------
// Matcher output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
  Sequence,
  Window,
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Sequence => "sequence",
      Self::Window => "window",
    })
  }
}

/// One dispatch paired with the render that satisfied it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
  pub beat: f64,
  pub dispatch_time: i64,
  pub render_time: i64,
  /// `render_time - dispatch_time`, saturating at the i64 bounds; negative
  /// means render logged before dispatch.
  pub lag_ms: i64,
}

impl MatchedPair {
  pub fn new(beat: f64, dispatch_time: i64, render_time: i64) -> Self {
    Self {
      beat,
      dispatch_time,
      render_time,
      lag_ms: render_time.saturating_sub(dispatch_time),
    }
  }

  pub fn is_negative(&self) -> bool {
    self.lag_ms < 0
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedDispatch {
  pub beat: f64,
  pub dispatch_time: i64,
}

impl From<&DispatchEvent> for UnmatchedDispatch {
  fn from(d: &DispatchEvent) -> Self {
    Self {
      beat: d.beat,
      dispatch_time: d.dispatch_time,
    }
  }
}

/// A sequence id present on both sides whose beats disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatMismatch {
  pub sequence: u64,
  pub dispatch_beat: f64,
  pub render_beat: f64,
}

/// Everything one matcher run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
  pub strategy: Strategy,
  pub pairs: Vec<MatchedPair>,
  pub unmatched: Vec<UnmatchedDispatch>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub mismatched: Vec<BeatMismatch>,
}

impl MatchOutcome {
  pub fn new(strategy: Strategy) -> Self {
    Self {
      strategy,
      pairs: Vec::new(),
      unmatched: Vec::new(),
      mismatched: Vec::new(),
    }
  }
}
