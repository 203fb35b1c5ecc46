//! Cursor Lag Analyzer: dispatch-to-render latency from console logs.
//!
//! Extracts dispatch and render events from free-text log lines, pairs them
//! (exact join on sequence ids when logged, otherwise a greedy time-window
//! match scored by beat similarity), and reports lag statistics with a
//! rule-based diagnosis.
//!
//! Pure batch computation over a complete log; no DB, no network.

pub mod config;
pub mod correlation;
pub mod diagnosis;
pub mod engine;
pub mod error;
pub mod extract;
pub mod input;
pub mod report;
pub mod sequence;
pub mod stats;
pub mod types;
pub mod window;

pub use config::Config;
pub use engine::Analyzer;
pub use error::AnalysisError;
pub use extract::EventGrammar;
pub use report::{Explanation, Report};
pub use types::{DispatchEvent, MatchOutcome, MatchedPair, RenderEvent, Strategy, UnmatchedDispatch};
