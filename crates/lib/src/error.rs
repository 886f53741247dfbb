//! Error types for builder command execution and output resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of everything that can go wrong while running a
/// builder command or querying the build tool.
///
/// `Timeout` and `NonZeroExit` are usually reported as a
/// [`ProcessOutcome`](crate::runner::ProcessOutcome) rather than an error; the
/// build output query is the exception, since it needs stdout to be useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  SpawnFailure,
  Timeout,
  NonZeroExit,
  MalformedResponse,
  InterruptedWait,
}

impl std::fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      ErrorKind::SpawnFailure => "spawn failure",
      ErrorKind::Timeout => "timeout",
      ErrorKind::NonZeroExit => "non-zero exit",
      ErrorKind::MalformedResponse => "malformed response",
      ErrorKind::InterruptedWait => "interrupted wait",
    };
    f.write_str(name)
  }
}

/// Errors that can occur while running a builder command or resolving a
/// built target's output path.
#[derive(Debug, Error)]
pub enum BuilderError {
  /// The command line was empty or whitespace only.
  #[error("refusing to run an empty command line")]
  EmptyCommand,

  /// The process could not be created (missing program, permissions, bad cwd).
  #[error("failed to spawn `{cmd}` in {cwd}: {source}")]
  Spawn {
    cmd: String,
    cwd: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The runtime used by the blocking facade could not be started.
  #[error("failed to start runtime: {0}")]
  Runtime(#[source] std::io::Error),

  /// Waiting for the process failed before it reported an exit status.
  #[error("interrupted while waiting for `{cmd}`: {source}")]
  Wait {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// Reading the stderr diagnostics of a failed process did not complete.
  #[error("failed to read diagnostics of `{cmd}`: {source}")]
  Drain {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The build output query did not finish within the configured timeout.
  #[error("`{cmd}` timed out after {secs}s")]
  QueryTimedOut { cmd: String, secs: u64 },

  /// The build output query exited unsuccessfully.
  #[error("`{cmd}` failed with exit code {code:?}: {stderr}")]
  QueryFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// The build output query did not print a JSON object.
  #[error("malformed build output response: {0}")]
  MalformedResponse(#[from] serde_json::Error),

  /// The output entry for a target is not a string-like JSON value.
  #[error("output of {target} is not a path: {value}")]
  NonScalarOutput { target: String, value: String },
}

impl BuilderError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      BuilderError::EmptyCommand | BuilderError::Spawn { .. } | BuilderError::Runtime(_) => ErrorKind::SpawnFailure,
      BuilderError::Wait { .. } | BuilderError::Drain { .. } => ErrorKind::InterruptedWait,
      BuilderError::QueryTimedOut { .. } => ErrorKind::Timeout,
      BuilderError::QueryFailed { .. } => ErrorKind::NonZeroExit,
      BuilderError::MalformedResponse(_) | BuilderError::NonScalarOutput { .. } => ErrorKind::MalformedResponse,
    }
  }
}
