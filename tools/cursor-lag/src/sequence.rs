//! Exact join on sequence ids assigned by the producer of the log.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::Config;
use crate::types::{BeatMismatch, DispatchEvent, MatchOutcome, MatchedPair, RenderEvent, Strategy, UnmatchedDispatch};

/// Index events by sequence id. A repeated id overwrites the earlier event.
fn index_by_sequence<'a, T>(
  events: &'a [T],
  kind: &str,
  sequence: impl Fn(&T) -> Option<u64>,
) -> BTreeMap<u64, &'a T> {
  let mut by_seq = BTreeMap::new();
  for event in events {
    if let Some(seq) = sequence(event) {
      if by_seq.insert(seq, event).is_some() {
        warn!(kind, seq, "duplicate sequence id, keeping the later event");
      }
    }
  }
  by_seq
}

/// Pair dispatches and renders sharing a sequence id.
///
/// Dispatch ids are visited in ascending order. An id with no render becomes an
/// unmatched dispatch; an id whose beats disagree beyond `beat_tolerance` is
/// recorded as a mismatch. Render-only ids and dispatches without an id are
/// ignored.
pub fn match_by_sequence(
  dispatches: &[DispatchEvent],
  renders: &[RenderEvent],
  config: &Config,
) -> MatchOutcome {
  let dispatch_by_seq = index_by_sequence(dispatches, "dispatch", |d| d.sequence);
  let render_by_seq = index_by_sequence(renders, "render", |r| r.sequence);

  let without_id = dispatches.iter().filter(|d| d.sequence.is_none()).count();
  if without_id > 0 {
    debug!(without_id, "dispatches without a sequence id skipped");
  }

  let mut outcome = MatchOutcome::new(Strategy::Sequence);
  for (&seq, dispatch) in &dispatch_by_seq {
    let Some(render) = render_by_seq.get(&seq) else {
      outcome.unmatched.push(UnmatchedDispatch::from(*dispatch));
      continue;
    };

    if (dispatch.beat - render.beat).abs() < config.beat_tolerance {
      outcome
        .pairs
        .push(MatchedPair::new(dispatch.beat, dispatch.dispatch_time, render.render_time));
    } else {
      warn!(
        seq,
        dispatch_beat = dispatch.beat,
        render_beat = render.beat,
        "sequence id matched but beats disagree"
      );
      outcome.mismatched.push(BeatMismatch {
        sequence: seq,
        dispatch_beat: dispatch.beat,
        render_beat: render.beat,
      });
    }
  }
  outcome
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dispatch(beat: f64, t: i64, seq: Option<u64>) -> DispatchEvent {
    DispatchEvent {
      beat,
      source_time: 0.0,
      dispatch_time: t,
      sequence: seq,
    }
  }

  fn render(beat: f64, t: i64, seq: Option<u64>) -> RenderEvent {
    RenderEvent {
      beat,
      render_time: t,
      sequence: seq,
    }
  }

  #[test]
  fn pairs_by_id_in_ascending_order() {
    let config = Config::default();
    let d = vec![dispatch(2.0, 200, Some(1)), dispatch(1.0, 100, Some(0))];
    let r = vec![render(1.0, 110, Some(0)), render(2.0, 260, Some(1))];
    let outcome = match_by_sequence(&d, &r, &config);

    assert_eq!(outcome.strategy, Strategy::Sequence);
    let lags: Vec<_> = outcome.pairs.iter().map(|p| p.lag_ms).collect();
    assert_eq!(lags, vec![10, 60]);
    assert!(outcome.unmatched.is_empty());
  }

  #[test]
  fn missing_render_is_unmatched() {
    let config = Config::default();
    let d = vec![dispatch(1.0, 100, Some(0)), dispatch(2.0, 200, Some(1))];
    let r = vec![render(1.0, 110, Some(0))];
    let outcome = match_by_sequence(&d, &r, &config);

    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(
      outcome.unmatched,
      vec![UnmatchedDispatch {
        beat: 2.0,
        dispatch_time: 200
      }]
    );
  }

  #[test]
  fn render_only_ids_are_ignored() {
    let config = Config::default();
    let d = vec![dispatch(1.0, 100, Some(0))];
    let r = vec![render(1.0, 110, Some(0)), render(9.0, 900, Some(7))];
    let outcome = match_by_sequence(&d, &r, &config);
    assert_eq!(outcome.pairs.len(), 1);
    assert!(outcome.unmatched.is_empty());
    assert!(outcome.mismatched.is_empty());
  }

  #[test]
  fn disagreeing_beats_are_not_paired() {
    let config = Config::default();
    let d = vec![dispatch(1.0, 100, Some(0))];
    let r = vec![render(1.5, 110, Some(0))];
    let outcome = match_by_sequence(&d, &r, &config);
    assert!(outcome.pairs.is_empty());
    assert!(outcome.unmatched.is_empty());
    assert_eq!(outcome.mismatched.len(), 1);
    assert_eq!(outcome.mismatched[0].sequence, 0);
  }

  #[test]
  fn beats_within_tolerance_agree() {
    let config = Config::default();
    let d = vec![dispatch(1.0, 100, Some(0))];
    let r = vec![render(1.005, 104, Some(0))];
    let outcome = match_by_sequence(&d, &r, &config);
    assert_eq!(outcome.pairs.len(), 1);
  }

  #[test]
  fn render_before_dispatch_keeps_negative_lag() {
    let config = Config::default();
    let d = vec![dispatch(1.0, 100, Some(0))];
    let r = vec![render(1.0, 90, Some(0))];
    let outcome = match_by_sequence(&d, &r, &config);
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].lag_ms, -10);
    assert!(outcome.pairs[0].is_negative());
  }

  #[test]
  fn duplicate_dispatch_id_keeps_last() {
    let config = Config::default();
    let d = vec![dispatch(1.0, 100, Some(0)), dispatch(1.0, 150, Some(0))];
    let r = vec![render(1.0, 170, Some(0))];
    let outcome = match_by_sequence(&d, &r, &config);
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].dispatch_time, 150);
    assert_eq!(outcome.pairs[0].lag_ms, 20);
  }

  #[test]
  fn dispatches_without_ids_are_skipped() {
    let config = Config::default();
    let d = vec![dispatch(1.0, 100, None), dispatch(2.0, 200, Some(3))];
    let r = vec![render(2.0, 230, Some(3))];
    let outcome = match_by_sequence(&d, &r, &config);
    assert_eq!(outcome.pairs.len(), 1);
    assert!(outcome.unmatched.is_empty());
  }
}
