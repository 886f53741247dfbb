//! Where diagnostics of failed builder commands go.

use tracing::warn;

/// Receives stderr lines of a failed subprocess, one call per line.
pub trait DiagnosticSink: Send + Sync {
  fn warn(&self, line: &str);
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
  fn warn(&self, line: &str) {
    warn!("{}", line);
  }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
  fn warn(&self, line: &str) {
    (**self).warn(line)
  }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
  fn warn(&self, line: &str) {
    (**self).warn(line)
  }
}
