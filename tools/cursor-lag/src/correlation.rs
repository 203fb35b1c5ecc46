//! Pick a correlation strategy for a run and execute it.
//!
//! Sequence ids are authoritative whenever the producer logged them; without
//! them the window matcher approximates the pairing.

use tracing::debug;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::sequence;
use crate::types::{ExtractedEvents, MatchOutcome, Strategy};
use crate::window;

pub fn select_strategy(events: &ExtractedEvents) -> Strategy {
  if events.has_sequence_ids() {
    Strategy::Sequence
  } else {
    Strategy::Window
  }
}

/// Correlate the two streams with the applicable strategy.
///
/// Returns `NoMatches` (with a sample of raw events) if no pair was formed.
pub fn correlate(events: &ExtractedEvents, config: &Config) -> Result<MatchOutcome, AnalysisError> {
  let strategy = select_strategy(events);
  debug!(%strategy, "selected correlation strategy");

  let outcome = match strategy {
    Strategy::Sequence => sequence::match_by_sequence(&events.dispatches, &events.renders, config),
    Strategy::Window => window::match_by_window(&events.dispatches, &events.renders, config),
  };

  if outcome.pairs.is_empty() {
    return Err(AnalysisError::NoMatches {
      strategy,
      dispatch_sample: events.dispatches.iter().take(config.debug_sample).cloned().collect(),
      render_sample: events.renders.iter().take(config.debug_sample).cloned().collect(),
    });
  }
  Ok(outcome)
}
