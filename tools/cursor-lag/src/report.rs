//! Human-readable report rendering.

use std::fmt;

use serde::Serialize;

use crate::config::Config;
use crate::diagnosis::{Finding, Level};
use crate::error::AnalysisError;
use crate::extract::{DISPATCH_SAMPLE, RENDER_SAMPLE};
use crate::stats::LagStats;
use crate::types::{MatchOutcome, MatchedPair, Strategy};

const RULE_WIDTH: usize = 70;

/// Result of one successful analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
  pub run_id: String,
  pub dispatch_count: usize,
  pub render_count: usize,
  pub outcome: MatchOutcome,
  pub stats: LagStats,
  pub findings: Vec<Finding>,
  #[serde(skip)]
  pub(crate) config: Config,
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
  writeln!(f)?;
  writeln!(f, "{}", title)?;
  writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

fn pair_line(f: &mut fmt::Formatter<'_>, pair: &MatchedPair) -> fmt::Result {
  writeln!(
    f,
    "Beat {:6.2}: {:4}ms lag (Dispatch: {}, Render: {})",
    pair.beat, pair.lag_ms, pair.dispatch_time, pair.render_time
  )
}

fn bucket_line(f: &mut fmt::Formatter<'_>, label: &str, count: usize, total: usize) -> fmt::Result {
  let pct = if total == 0 {
    0.0
  } else {
    count as f64 / total as f64 * 100.0
  };
  writeln!(f, "{:<24}{:3}/{} ({:5.1}%)", label, count, total, pct)
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let c = &self.config;
    let s = &self.stats;
    let h = &s.histogram;

    writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(f, "Cursor lag analysis ({})", self.run_id)?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(f, "Total dispatch events: {}", self.dispatch_count)?;
    writeln!(f, "Total render events:   {}", self.render_count)?;
    writeln!(f, "Matching strategy:     {}", self.outcome.strategy)?;

    heading(f, "LAG STATISTICS (dispatch -> render)")?;
    writeln!(f, "Matched updates: {}", s.count)?;
    writeln!(f, "Best:            {}ms", s.min)?;
    writeln!(f, "Mean:            {:.1}ms", s.mean)?;
    writeln!(f, "Median:          {:.1}ms", s.median)?;
    writeln!(f, "Worst:           {}ms", s.max)?;

    heading(f, "PERFORMANCE BREAKDOWN")?;
    bucket_line(f, &format!("Excellent (<{}ms):", c.excellent_below_ms), h.excellent, s.count)?;
    bucket_line(
      f,
      &format!("Good ({}-{}ms):", c.excellent_below_ms, c.good_below_ms),
      h.good,
      s.count,
    )?;
    bucket_line(
      f,
      &format!("Acceptable ({}-{}ms):", c.good_below_ms, c.acceptable_below_ms),
      h.acceptable,
      s.count,
    )?;
    bucket_line(f, &format!("Poor (>={}ms):", c.acceptable_below_ms), h.poor, s.count)?;
    if h.negative > 0 {
      bucket_line(f, "NEGATIVE (anomaly):", h.negative, s.count)?;
    }

    heading(f, "WORST LAG EVENTS")?;
    for pair in &s.worst {
      pair_line(f, pair)?;
    }

    heading(f, "BEST LAG EVENTS")?;
    for pair in &s.best {
      pair_line(f, pair)?;
    }

    if !s.negatives.is_empty() {
      heading(f, "NEGATIVE LAG EVENTS (render logged before dispatch)")?;
      for pair in &s.negatives {
        pair_line(f, pair)?;
      }
    }

    let unmatched = &self.outcome.unmatched;
    if self.outcome.strategy == Strategy::Window && !unmatched.is_empty() {
      heading(f, "UNMATCHED DISPATCHES")?;
      writeln!(f, "{} dispatches had no matching render:", unmatched.len())?;
      for u in unmatched.iter().take(c.unmatched_sample) {
        writeln!(f, "  Beat {:.2} dispatched at {}", u.beat, u.dispatch_time)?;
      }
      if unmatched.len() > c.unmatched_sample {
        writeln!(f, "  ... and {} more", unmatched.len() - c.unmatched_sample)?;
      }
    } else if !unmatched.is_empty() {
      writeln!(f)?;
      writeln!(f, "Dispatch sequence ids without a render: {}", unmatched.len())?;
    }

    if !self.outcome.mismatched.is_empty() {
      heading(f, "SEQUENCE IDS WITH MISMATCHED BEATS")?;
      for m in self.outcome.mismatched.iter().take(c.report_limit) {
        writeln!(
          f,
          "  Seq {}: dispatch beat {:.2}, render beat {:.2}",
          m.sequence, m.dispatch_beat, m.render_beat
        )?;
      }
    }

    heading(f, "DIAGNOSIS")?;
    for finding in &self.findings {
      let tag = match finding.level {
        Level::Ok => "ok",
        Level::Warning => "warn",
        Level::Critical => "FAIL",
      };
      writeln!(f, "[{}] {}", tag, finding.message)?;
      for hint in &finding.hints {
        writeln!(f, "       -> {}", hint)?;
      }
    }
    Ok(())
  }
}

/// Explanation printed when the analysis ended without a report.
pub struct Explanation<'a>(pub &'a AnalysisError);

impl fmt::Display for Explanation<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      AnalysisError::EmptyStream { dispatches, renders } => {
        writeln!(f, "Total dispatch events: {}", dispatches)?;
        writeln!(f, "Total render events:   {}", renders)?;
        if *dispatches == 0 {
          writeln!(f, "No dispatch events found in logs!")?;
        }
        if *renders == 0 {
          writeln!(f, "No render events found in logs!")?;
        }
        writeln!(f, "Expected lines such as:")?;
        writeln!(f, "  {}", DISPATCH_SAMPLE)?;
        writeln!(f, "  {}", RENDER_SAMPLE)
      }
      AnalysisError::NoMatches {
        strategy,
        dispatch_sample,
        render_sample,
      } => {
        writeln!(f, "No matching dispatch-render pairs found ({} matching)!", strategy)?;
        writeln!(f, "First dispatch events:")?;
        for d in dispatch_sample {
          match d.sequence {
            Some(seq) => writeln!(f, "  Beat {:.2} at {} (Seq={})", d.beat, d.dispatch_time, seq)?,
            None => writeln!(f, "  Beat {:.2} at {}", d.beat, d.dispatch_time)?,
          }
        }
        writeln!(f, "First render events:")?;
        for r in render_sample {
          match r.sequence {
            Some(seq) => writeln!(f, "  Beat {:.2} at {} (Seq={})", r.beat, r.render_time, seq)?,
            None => writeln!(f, "  Beat {:.2} at {}", r.beat, r.render_time)?,
          }
        }
        Ok(())
      }
      other => writeln!(f, "{}", other),
    }
  }
}
