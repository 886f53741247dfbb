//! Builder command execution.
//!
//! [`CommandRunner`] launches one generated rule's command, waits for it up to
//! the configured timeout, and hands stderr of failed runs to a
//! [`DiagnosticSink`].

pub mod cmd;
pub mod diagnostics;
pub mod types;

pub use cmd::{CommandRunner, run_builder_command};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use types::{CommandInvocation, ProcessOutcome};
