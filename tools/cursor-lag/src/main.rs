//! Binary entrypoint: analyze one captured console log and print the report.
//!
//! Exit code 1 when no input path is given or it cannot be read. A log with
//! no events or no matching pairs still exits 0 with an explanation.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cursor_lag::{input, Analyzer, Explanation};

const CAPTURE_HELP: &str = "\
To capture logs:
  1. Open the browser console
  2. Run your performance
  3. Right-click the console -> Save as... -> logs.txt

For exact matching, log a sequence number on both sides:
  ... DispatchTime=<ms>, Seq=<n>
  [Cursor Render] Beat=<beat>, RenderTime=<ms>, Seq=<n>";

#[derive(Debug, Parser)]
#[command(name = "cursor-lag", version, about = "Dispatch-to-render cursor lag analysis", after_help = CAPTURE_HELP)]
struct Cli {
  /// Console log to analyze (`-` reads stdin)
  input: String,
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) if !e.use_stderr() => e.exit(),
    Err(e) => {
      let _ = writeln!(io::stderr(), "{}", e);
      return ExitCode::from(1);
    }
  };

  init_logging();

  if let Err(e) = run(&cli) {
    let mut stderr = io::stderr();
    let _ = writeln!(stderr, "cursor-lag: {:#}", e);
    let _ = writeln!(stderr, "{}", Cli::command().render_usage());
    return ExitCode::from(1);
  }
  ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
  let text = input::load(&cli.input)?;
  let analyzer = Analyzer::with_defaults();

  let mut out = io::BufWriter::new(io::stdout().lock());
  match analyzer.analyze(&text) {
    Ok(report) => write!(out, "{}", report)?,
    Err(e) if e.is_reportable() => write!(out, "{}", Explanation(&e))?,
    Err(e) => return Err(e.into()),
  }
  out.flush().context("writing report")?;
  Ok(())
}

/// Diagnostics go to stderr so stdout carries only the report.
fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().compact().with_writer(io::stderr))
    .try_init();
}
