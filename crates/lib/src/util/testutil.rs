//! Test utilities for genrule-lib.
//!
//! Cross-platform shell snippets plus in-memory doubles for the diagnostic
//! sink and the build tool query.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::BuilderError;
use crate::output::CommandOutput;
use crate::runner::DiagnosticSink;

/// Returns a shell command that creates an empty file in the current directory.
#[cfg(unix)]
pub fn touch_marker(filename: &str) -> String {
  format!("touch {}", filename)
}

#[cfg(windows)]
pub fn touch_marker(filename: &str) -> String {
  format!("type nul > {}", filename)
}

/// Sink that keeps every diagnostic line it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
  lines: Mutex<Vec<String>>,
}

impl RecordingSink {
  pub fn lines(&self) -> Vec<String> {
    self.lines.lock().unwrap().clone()
  }
}

impl DiagnosticSink for RecordingSink {
  fn warn(&self, line: &str) {
    self.lines.lock().unwrap().push(line.to_string());
  }
}

/// One recorded call to [`StubOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCall {
  pub cwd: PathBuf,
  pub program: String,
  pub args: Vec<String>,
}

/// Build tool double that answers every query with the same response.
#[derive(Debug)]
pub struct StubOutput {
  response: Result<Vec<u8>, (i32, String)>,
  calls: Mutex<Vec<QueryCall>>,
}

impl StubOutput {
  pub fn new(response: &str) -> Self {
    Self {
      response: Ok(response.as_bytes().to_vec()),
      calls: Mutex::new(Vec::new()),
    }
  }

  /// A build tool that always exits with `code`, printing `stderr`.
  pub fn failing(code: i32, stderr: &str) -> Self {
    Self {
      response: Err((code, stderr.to_string())),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> Vec<QueryCall> {
    self.calls.lock().unwrap().clone()
  }
}

impl CommandOutput for StubOutput {
  async fn stdout(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<Vec<u8>, BuilderError> {
    self.calls.lock().unwrap().push(QueryCall {
      cwd: cwd.to_path_buf(),
      program: program.to_string(),
      args: args.iter().map(|arg| arg.to_string()).collect(),
    });

    match &self.response {
      Ok(stdout) => Ok(stdout.clone()),
      Err((code, stderr)) => Err(BuilderError::QueryFailed {
        cmd: format!("{} {}", program, args.join(" ")),
        code: Some(*code),
        stderr: stderr.clone(),
      }),
    }
  }
}
