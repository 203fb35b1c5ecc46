//! Fallback pairing by time proximity when the log carries no sequence ids.
//!
//! Greedy assignment: dispatches claim renders in ascending time order, each
//! taking the unused render with the lowest composite score
//!
//!   score = elapsed_ms + beat_mismatch_penalty_per_unit * |beat difference|
//!
//! among renders at or after the dispatch and no later than
//! `max_time_window_ms`. Ties go to the earliest render. This is not an
//! optimal bipartite assignment.

use tracing::debug;

use crate::config::Config;
use crate::types::{DispatchEvent, MatchOutcome, MatchedPair, RenderEvent, Strategy, UnmatchedDispatch};

/// Composite score of pairing `dispatch` with `render`; lower is better.
pub fn candidate_score(dispatch: &DispatchEvent, render: &RenderEvent, config: &Config) -> f64 {
  let elapsed = render.render_time.saturating_sub(dispatch.dispatch_time) as f64;
  elapsed + config.beat_mismatch_penalty_per_unit * (render.beat - dispatch.beat).abs()
}

pub fn match_by_window(
  dispatches: &[DispatchEvent],
  renders: &[RenderEvent],
  config: &Config,
) -> MatchOutcome {
  let mut dispatches: Vec<&DispatchEvent> = dispatches.iter().collect();
  dispatches.sort_by_key(|d| d.dispatch_time);
  let mut renders: Vec<&RenderEvent> = renders.iter().collect();
  renders.sort_by_key(|r| r.render_time);

  // Indexes into the sorted render list; scoped to this call.
  let mut used = vec![false; renders.len()];
  let mut outcome = MatchOutcome::new(Strategy::Window);

  for dispatch in dispatches {
    // Renders before the dispatch can never satisfy it.
    let first = renders.partition_point(|r| r.render_time < dispatch.dispatch_time);

    let mut best: Option<(usize, f64)> = None;
    for (idx, render) in renders.iter().enumerate().skip(first) {
      if render.render_time.saturating_sub(dispatch.dispatch_time) > config.max_time_window_ms {
        break;
      }
      if used[idx] {
        continue;
      }
      let score = candidate_score(dispatch, render, config);
      if best.map_or(true, |(_, best_score)| score < best_score) {
        best = Some((idx, score));
      }
    }

    match best {
      Some((idx, _)) => {
        used[idx] = true;
        let render = renders[idx];
        outcome
          .pairs
          .push(MatchedPair::new(dispatch.beat, dispatch.dispatch_time, render.render_time));
      }
      None => outcome.unmatched.push(UnmatchedDispatch::from(dispatch)),
    }
  }

  debug!(
    pairs = outcome.pairs.len(),
    unmatched = outcome.unmatched.len(),
    unused_renders = used.iter().filter(|u| !**u).count(),
    "window matching done"
  );
  outcome
}
