//! Extract typed dispatch/render events from raw console log text.
//!
//! Each grammar is scanned independently over the whole text, so the two
//! event kinds may interleave in any order and appear anywhere in a line.
//! Matches whose numeric fields do not parse are dropped silently.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::types::{DispatchEvent, ExtractedEvents, RenderEvent};

/// Example line the default dispatch grammar recognizes.
pub const DISPATCH_SAMPLE: &str =
  "DISPATCHING BEAT UPDATE: 1.0 at time 0.500s (predicted: 0.500s), DispatchTime=1234567890, Seq=0";
/// Example line the default render grammar recognizes.
pub const RENDER_SAMPLE: &str = "[Cursor Render] Beat=1.0, RenderTime=1234567890, Seq=0";

const DISPATCH_PATTERN: &str = r"DISPATCHING BEAT UPDATE: (?P<beat>[\d.]+) at time (?P<source_time>[\d.]+)s.*DispatchTime=(?P<time>\d+)(?:, Seq=(?P<seq>\d+))?";
const RENDER_PATTERN: &str =
  r"\[Cursor Render\] Beat=(?P<beat>[\d.]+), RenderTime=(?P<time>\d+)(?:, Seq=(?P<seq>\d+))?";

/// The pair of patterns that recognize dispatch and render lines.
///
/// Named groups: `beat` and `time` are required in both patterns,
/// `source_time` (dispatch only, defaults to 0.0) and `seq` are optional.
#[derive(Debug, Clone)]
pub struct EventGrammar {
  dispatch: Regex,
  render: Regex,
}

impl Default for EventGrammar {
  fn default() -> Self {
    static DEFAULT: OnceLock<EventGrammar> = OnceLock::new();
    DEFAULT
      .get_or_init(|| EventGrammar {
        dispatch: Regex::new(DISPATCH_PATTERN).expect("dispatch pattern compiles"),
        render: Regex::new(RENDER_PATTERN).expect("render pattern compiles"),
      })
      .clone()
  }
}

impl EventGrammar {
  /// Build a grammar from custom patterns.
  pub fn new(dispatch: &str, render: &str) -> Result<Self, AnalysisError> {
    let dispatch = Regex::new(dispatch)?;
    let render = Regex::new(render)?;
    require_groups(&dispatch, "dispatch")?;
    require_groups(&render, "render")?;
    Ok(Self { dispatch, render })
  }

  pub fn dispatch_pattern(&self) -> &str {
    self.dispatch.as_str()
  }

  pub fn render_pattern(&self) -> &str {
    self.render.as_str()
  }

  /// Lazily yield every well-formed dispatch event in `text`, in source order.
  pub fn dispatches<'t>(&'t self, text: &'t str) -> impl Iterator<Item = DispatchEvent> + 't {
    self.dispatch.captures_iter(text).filter_map(|caps| parse_dispatch(&caps))
  }

  /// Lazily yield every well-formed render event in `text`, in source order.
  pub fn renders<'t>(&'t self, text: &'t str) -> impl Iterator<Item = RenderEvent> + 't {
    self.render.captures_iter(text).filter_map(|caps| parse_render(&caps))
  }
}

fn require_groups(re: &Regex, which: &str) -> Result<(), AnalysisError> {
  for group in ["beat", "time"] {
    if !re.capture_names().flatten().any(|name| name == group) {
      return Err(AnalysisError::grammar(
        which,
        &format!("missing named group `{}`", group),
      ));
    }
  }
  Ok(())
}

/// Parse a named group; `None` when absent or malformed.
fn field<T: FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
  caps.name(name)?.as_str().parse().ok()
}

/// Millisecond timestamps are non-negative; a signed value drops the event.
fn timestamp(caps: &Captures<'_>) -> Option<i64> {
  field(caps, "time").filter(|t: &i64| *t >= 0)
}

/// Absent group is `Some(None)`; present but malformed is `None` (drop the event).
fn optional_seq(caps: &Captures<'_>) -> Option<Option<u64>> {
  match caps.name("seq") {
    Some(m) => m.as_str().parse().ok().map(Some),
    None => Some(None),
  }
}

fn parse_dispatch(caps: &Captures<'_>) -> Option<DispatchEvent> {
  let beat: f64 = field(caps, "beat").filter(|b: &f64| b.is_finite())?;
  let source_time = match caps.name("source_time") {
    Some(m) => m.as_str().parse().ok().filter(|t: &f64| t.is_finite())?,
    None => 0.0,
  };
  Some(DispatchEvent {
    beat,
    source_time,
    dispatch_time: timestamp(caps)?,
    sequence: optional_seq(caps)?,
  })
}

fn parse_render(caps: &Captures<'_>) -> Option<RenderEvent> {
  let beat: f64 = field(caps, "beat").filter(|b: &f64| b.is_finite())?;
  Some(RenderEvent {
    beat,
    render_time: timestamp(caps)?,
    sequence: optional_seq(caps)?,
  })
}

/// Collect both event streams from `text`.
///
/// Returns `EmptyStream` when either kind has zero well-formed occurrences.
pub fn extract(text: &str, grammar: &EventGrammar) -> Result<ExtractedEvents, AnalysisError> {
  let events = ExtractedEvents {
    dispatches: grammar.dispatches(text).collect(),
    renders: grammar.renders(text).collect(),
  };

  info!(
    dispatches = events.dispatches.len(),
    renders = events.renders.len(),
    "extracted events"
  );
  debug!(
    dispatch_pattern = grammar.dispatch_pattern(),
    render_pattern = grammar.render_pattern(),
    "grammar"
  );

  if events.dispatches.is_empty() || events.renders.is_empty() {
    return Err(AnalysisError::EmptyStream {
      dispatches: events.dispatches.len(),
      renders: events.renders.len(),
    });
  }
  Ok(events)
}
