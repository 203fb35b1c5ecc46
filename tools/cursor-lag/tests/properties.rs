//! Property tests for the matchers and lag statistics.

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use cursor_lag::sequence::match_by_sequence;
use cursor_lag::stats::LagStats;
use cursor_lag::window::match_by_window;
use cursor_lag::{Config, DispatchEvent, MatchedPair, RenderEvent};

fn dispatch_strategy(with_seq: bool) -> impl Strategy<Value = DispatchEvent> {
  (0u32..16, 0i64..2_000, 0u64..20).prop_map(move |(beat, t, seq)| DispatchEvent {
    beat: f64::from(beat) / 2.0,
    source_time: 0.0,
    dispatch_time: t,
    sequence: with_seq.then_some(seq),
  })
}

fn render_strategy(with_seq: bool) -> impl Strategy<Value = RenderEvent> {
  (0u32..16, 0i64..2_000, 0u64..20).prop_map(move |(beat, t, seq)| RenderEvent {
    beat: f64::from(beat) / 2.0,
    render_time: t,
    sequence: with_seq.then_some(seq),
  })
}

proptest! {
  #[test]
  fn sequence_join_is_sound_and_complete(
    dispatches in prop::collection::vec(dispatch_strategy(true), 0..40),
    renders in prop::collection::vec(render_strategy(true), 0..40),
  ) {
    let config = Config::default();
    let outcome = match_by_sequence(&dispatches, &renders, &config);

    // Last write wins on both sides.
    let d_by_seq: BTreeMap<u64, &DispatchEvent> =
      dispatches.iter().map(|d| (d.sequence.unwrap(), d)).collect();
    let r_by_seq: BTreeMap<u64, &RenderEvent> =
      renders.iter().map(|r| (r.sequence.unwrap(), r)).collect();

    let mut expected_pairs = Vec::new();
    let mut expected_unmatched = 0;
    for (seq, d) in &d_by_seq {
      match r_by_seq.get(seq) {
        Some(r) if (d.beat - r.beat).abs() < config.beat_tolerance => {
          expected_pairs.push(MatchedPair::new(d.beat, d.dispatch_time, r.render_time));
        }
        Some(_) => {}
        None => expected_unmatched += 1,
      }
    }

    prop_assert_eq!(&outcome.pairs, &expected_pairs);
    prop_assert_eq!(outcome.unmatched.len(), expected_unmatched);
    for pair in &outcome.pairs {
      prop_assert_eq!(pair.lag_ms, pair.render_time - pair.dispatch_time);
    }
  }

  #[test]
  fn window_match_is_causal_bounded_and_one_to_one(
    dispatches in prop::collection::vec(dispatch_strategy(false), 0..40),
    renders in prop::collection::vec(render_strategy(false), 0..40),
    window in 1i64..400,
  ) {
    let config = Config { max_time_window_ms: window, ..Config::default() };
    let outcome = match_by_window(&dispatches, &renders, &config);

    prop_assert_eq!(outcome.pairs.len() + outcome.unmatched.len(), dispatches.len());

    // A render timestamp can back at most as many pairs as renders carry it.
    let mut available: BTreeMap<i64, usize> = BTreeMap::new();
    for r in &renders {
      *available.entry(r.render_time).or_insert(0) += 1;
    }
    let mut claimed: BTreeMap<i64, usize> = BTreeMap::new();
    for pair in &outcome.pairs {
      prop_assert!(pair.render_time >= pair.dispatch_time);
      prop_assert!(pair.lag_ms >= 0);
      prop_assert!(pair.lag_ms <= window);
      *claimed.entry(pair.render_time).or_insert(0) += 1;
    }
    for (t, n) in &claimed {
      prop_assert!(*n <= available.get(t).copied().unwrap_or(0), "render at {} used {} times", t, n);
    }
  }

  #[test]
  fn lag_stats_are_consistent(lags in prop::collection::vec(-500i64..5_000, 1..200)) {
    let config = Config::default();
    let pairs: Vec<_> = lags.iter().map(|&lag| MatchedPair::new(1.0, 10_000, 10_000 + lag)).collect();
    let stats = LagStats::from_pairs(&pairs, &config).unwrap();

    prop_assert_eq!(stats.count, lags.len());
    prop_assert!(stats.min as f64 <= stats.median && stats.median <= stats.max as f64);
    prop_assert!(stats.min as f64 <= stats.mean && stats.mean <= stats.max as f64);
    prop_assert_eq!(stats.histogram.total(), stats.count);
    prop_assert_eq!(stats.histogram.negative, lags.iter().filter(|l| **l < 0).count());
    prop_assert!(stats.worst.len() <= config.report_limit);
    prop_assert!(stats.worst.windows(2).all(|w| w[0].lag_ms >= w[1].lag_ms));
    prop_assert!(stats.best.windows(2).all(|w| w[0].lag_ms <= w[1].lag_ms));
    prop_assert!(stats.worst.iter().chain(&stats.best).all(|p| p.lag_ms >= 0));
    prop_assert!(stats.negatives.iter().all(|p| p.lag_ms < 0));
  }
}

#[test]
fn window_never_reuses_a_unique_render() {
  // Distinct render timestamps make the used set directly observable.
  let config = Config::default();
  let dispatches: Vec<_> = (0..50)
    .map(|i| DispatchEvent {
      beat: 1.0,
      source_time: 0.0,
      dispatch_time: i * 7,
      sequence: None,
    })
    .collect();
  let renders: Vec<_> = (0..30)
    .map(|i| RenderEvent {
      beat: 1.0,
      render_time: i * 11 + 3,
      sequence: None,
    })
    .collect();
  let outcome = match_by_window(&dispatches, &renders, &config);
  let used: HashSet<i64> = outcome.pairs.iter().map(|p| p.render_time).collect();
  assert_eq!(used.len(), outcome.pairs.len());
}
