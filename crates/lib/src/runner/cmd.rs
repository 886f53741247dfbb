//! Builder command execution.
//!
//! Runs a generated rule's command line through the platform shell, bounded by
//! the configured timeout. stderr is drained from the moment the process
//! starts so a chatty command cannot block on a full pipe; the lines are only
//! surfaced when the command fails. Waiting for the exit and collecting stderr
//! share one deadline.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::RunnerConfig;
use crate::error::BuilderError;
use crate::runner::diagnostics::{DiagnosticSink, TracingSink};
use crate::runner::types::{CommandInvocation, ProcessOutcome};

/// Runs builder commands and reports how they finished.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner<S = TracingSink> {
  config: RunnerConfig,
  sink: S,
}

impl CommandRunner<TracingSink> {
  pub fn new(config: RunnerConfig) -> Self {
    Self::with_sink(config, TracingSink)
  }
}

impl<S: DiagnosticSink> CommandRunner<S> {
  pub fn with_sink(config: RunnerConfig, sink: S) -> Self {
    Self { config, sink }
  }

  pub fn config(&self) -> &RunnerConfig {
    &self.config
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }

  /// Run one builder command to completion or timeout.
  ///
  /// The command inherits the current process environment and runs in
  /// `invocation.working_dir`. On a non-zero exit every stderr line is passed
  /// to the sink, in order, before returning.
  ///
  /// # Errors
  ///
  /// - [`BuilderError::EmptyCommand`] / [`BuilderError::Spawn`] if no process
  ///   could be started
  /// - [`BuilderError::Wait`] / [`BuilderError::Drain`] if waiting for the
  ///   process or collecting its diagnostics was cut short
  pub async fn run(&self, invocation: &CommandInvocation) -> Result<ProcessOutcome, BuilderError> {
    let cmd = invocation.command_line.trim();
    if cmd.is_empty() {
      return Err(BuilderError::EmptyCommand);
    }

    info!(cmd = %cmd, cwd = ?invocation.working_dir, "running builder command");

    let (shell, flag) = shell_invocation(self.config.shell.as_deref());

    let mut command = Command::new(shell);
    command
      .arg(flag)
      .arg(cmd)
      .current_dir(&invocation.working_dir)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    debug!(shell = %shell, "spawning process");

    let deadline = deadline_after(self.config.timeout);
    let mut child = command.spawn().map_err(|source| BuilderError::Spawn {
      cmd: cmd.to_string(),
      cwd: invocation.working_dir.clone(),
      source,
    })?;

    let mut drain = child.stderr.take().map(StderrDrain::spawn);

    let status = match tokio::time::timeout_at(deadline, child.wait()).await {
      Ok(status) => status.map_err(|source| BuilderError::Wait {
        cmd: cmd.to_string(),
        source,
      })?,
      Err(_) => {
        warn!(cmd = %cmd, timeout_secs = self.config.timeout.as_secs(), "builder command timed out");
        if let Err(e) = child.start_kill() {
          debug!(error = %e, "failed to kill timed out process");
        }
        return Ok(ProcessOutcome::TimedOut);
      }
    };

    if status.success() {
      debug!(cmd = %cmd, "builder command succeeded");
      return Ok(ProcessOutcome::Success);
    }

    // A background process started by the command can hold stderr open after
    // the shell exits, so collection shares the command's deadline.
    let diagnostics = match drain.take() {
      Some(drain) => drain.collect_until(deadline, cmd).await.map_err(|source| BuilderError::Drain {
        cmd: cmd.to_string(),
        source,
      })?,
      None => Vec::new(),
    };

    info!(cmd = %cmd, code = ?status.code(), lines = diagnostics.len(), "builder command failed");
    for line in &diagnostics {
      self.sink.warn(line);
    }

    Ok(ProcessOutcome::NonZeroExit {
      code: status.code(),
      diagnostics,
    })
  }
}

/// Run a builder command with the default configuration, logging diagnostics
/// through `tracing`.
pub async fn run_builder_command(command_line: &str, working_dir: &Path) -> Result<ProcessOutcome, BuilderError> {
  CommandRunner::new(RunnerConfig::default())
    .run(&CommandInvocation::new(command_line, working_dir))
    .await
}

/// `now + timeout`, saturating for timeouts too large to represent.
fn deadline_after(timeout: Duration) -> Instant {
  let now = Instant::now();
  now.checked_add(timeout).unwrap_or(now + Duration::from_secs(100 * 365 * 24 * 60 * 60))
}

/// Background stderr reader. Lines are forwarded as they are read; the task is
/// aborted (closing the pipe) when the drain is dropped.
struct StderrDrain {
  lines: mpsc::UnboundedReceiver<String>,
  task: JoinHandle<io::Result<()>>,
}

impl StderrDrain {
  fn spawn<R: AsyncRead + Unpin + Send + 'static>(reader: R) -> Self {
    let (tx, lines) = mpsc::unbounded_channel();
    Self {
      lines,
      task: tokio::spawn(read_lines(reader, tx)),
    }
  }

  /// Collect lines until EOF or `deadline`, whichever comes first. Lines read
  /// before the deadline are kept.
  async fn collect_until(mut self, deadline: Instant, cmd: &str) -> io::Result<Vec<String>> {
    let mut collected = Vec::new();
    loop {
      match tokio::time::timeout_at(deadline, self.lines.recv()).await {
        Ok(Some(line)) => collected.push(line),
        Ok(None) => break,
        Err(_) => {
          warn!(cmd = %cmd, lines = collected.len(), "stderr still open at deadline, diagnostics truncated");
          return Ok(collected);
        }
      }
    }

    match (&mut self.task).await {
      Ok(result) => result.map(|()| collected),
      Err(e) => Err(io::Error::other(e)),
    }
  }
}

impl Drop for StderrDrain {
  fn drop(&mut self) {
    self.task.abort();
  }
}

/// Read a stream to EOF as lines. `\r\n` endings are accepted and invalid
/// UTF-8 is replaced rather than rejected.
async fn read_lines<R: AsyncRead + Unpin>(reader: R, tx: mpsc::UnboundedSender<String>) -> io::Result<()> {
  let mut segments = BufReader::new(reader).split(b'\n');
  while let Some(segment) = segments.next_segment().await? {
    let segment = segment.strip_suffix(b"\r").unwrap_or(&segment);
    if tx.send(String::from_utf8_lossy(segment).into_owned()).is_err() {
      break;
    }
  }
  Ok(())
}

/// The shell program and the flag that makes it run one command string.
///
/// Command lines are POSIX shell on Unix and `cmd.exe` syntax on Windows. A
/// configured shell replaces the program but must accept the platform's flag.
fn shell_invocation(shell: Option<&str>) -> (&str, &'static str) {
  #[cfg(unix)]
  const PLATFORM: (&str, &str) = ("/bin/sh", "-c");
  #[cfg(windows)]
  const PLATFORM: (&str, &str) = ("cmd.exe", "/C");

  (shell.unwrap_or(PLATFORM.0), PLATFORM.1)
}
