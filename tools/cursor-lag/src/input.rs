//! Load the log to analyze from a file path, or stdin for `-`.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::AnalysisError;

/// Path value that selects standard input.
pub const STDIN_PATH: &str = "-";

pub fn load(path: &str) -> Result<String, AnalysisError> {
  if path == STDIN_PATH {
    let mut text = String::new();
    io::stdin()
      .lock()
      .read_to_string(&mut text)
      .map_err(|e| AnalysisError::input("<stdin>", e))?;
    return Ok(text);
  }
  load_file(Path::new(path))
}

/// Read a log file. Invalid UTF-8 is replaced rather than rejected.
pub fn load_file(path: &Path) -> Result<String, AnalysisError> {
  let bytes = fs::read(path).map_err(|e| AnalysisError::input(path.display().to_string(), e))?;
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}
