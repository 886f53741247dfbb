//! Types for builder command execution.

use std::path::PathBuf;

use crate::error::ErrorKind;

/// A single builder command to run for a generated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
  /// The rule's command line, interpreted by the configured shell.
  pub command_line: String,
  /// Directory the command runs in, usually the build root.
  pub working_dir: PathBuf,
}

impl CommandInvocation {
  pub fn new(command_line: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
    Self {
      command_line: command_line.into(),
      working_dir: working_dir.into(),
    }
  }
}

/// How a builder command finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
  /// Exited with status 0 within the timeout.
  Success,

  /// Exited with a non-zero status.
  NonZeroExit {
    /// Exit code, `None` if the process was killed by a signal.
    code: Option<i32>,
    /// Lines written to stderr, in order.
    diagnostics: Vec<String>,
  },

  /// Did not exit within the timeout and was killed.
  TimedOut,
}

impl ProcessOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, ProcessOutcome::Success)
  }

  /// The error kind a caller would report for this outcome, if it failed.
  pub fn failure_kind(&self) -> Option<ErrorKind> {
    match self {
      ProcessOutcome::Success => None,
      ProcessOutcome::NonZeroExit { .. } => Some(ErrorKind::NonZeroExit),
      ProcessOutcome::TimedOut => Some(ErrorKind::Timeout),
    }
  }

  /// Captured stderr lines; empty unless the process exited non-zero.
  pub fn diagnostics(&self) -> &[String] {
    match self {
      ProcessOutcome::NonZeroExit { diagnostics, .. } => diagnostics,
      _ => &[],
    }
  }
}
