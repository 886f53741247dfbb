//! Capturing the stdout of a build tool invocation.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::error::BuilderError;
use crate::runner::{DiagnosticSink, TracingSink};

/// Runs a program to completion and hands back what it printed on stdout.
pub trait CommandOutput: Send + Sync {
  fn stdout(
    &self,
    cwd: &Path,
    program: &str,
    args: &[&str],
  ) -> impl Future<Output = Result<Vec<u8>, BuilderError>> + Send;
}

/// Spawns the program directly (no shell), bounded by a timeout. stderr of a
/// failed run goes to the sink one line at a time.
#[derive(Debug, Clone)]
pub struct ProcessOutput<S = TracingSink> {
  timeout: Duration,
  sink: S,
}

impl ProcessOutput<TracingSink> {
  pub fn new(timeout: Duration) -> Self {
    Self::with_sink(timeout, TracingSink)
  }
}

impl Default for ProcessOutput<TracingSink> {
  fn default() -> Self {
    Self::new(RunnerConfig::default().timeout)
  }
}

impl<S: DiagnosticSink> ProcessOutput<S> {
  pub fn with_sink(timeout: Duration, sink: S) -> Self {
    Self { timeout, sink }
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }
}

impl<S: DiagnosticSink> CommandOutput for ProcessOutput<S> {
  async fn stdout(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<Vec<u8>, BuilderError> {
    let cmd = render(program, args);
    debug!(cmd = %cmd, cwd = ?cwd, "capturing command output");

    let mut command = Command::new(program);
    command
      .args(args)
      .current_dir(cwd)
      .stdin(Stdio::null())
      .kill_on_drop(true);

    let output = match tokio::time::timeout(self.timeout, command.output()).await {
      Ok(output) => output.map_err(|source| BuilderError::Spawn {
        cmd: cmd.clone(),
        cwd: cwd.to_path_buf(),
        source,
      })?,
      Err(_) => {
        return Err(BuilderError::QueryTimedOut {
          cmd,
          secs: self.timeout.as_secs(),
        });
      }
    };

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      info!(cmd = %cmd, code = ?output.status.code(), "build tool query failed");
      for line in stderr.lines() {
        self.sink.warn(line);
      }
      return Err(BuilderError::QueryFailed {
        cmd,
        code: output.status.code(),
        stderr: stderr.trim().to_string(),
      });
    }

    Ok(output.stdout)
  }
}

fn render(program: &str, args: &[&str]) -> String {
  std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}
