//! genrule-lib: run generated build rules and locate their outputs
//!
//! This crate is the process-facing edge of project generation:
//! - `sources`: assembles the space-separated source list of a rule
//! - `runner`: runs a rule's builder command with a timeout and captures
//!   stderr diagnostics when it fails
//! - `output`: asks the build tool for the output path of a built target
//! - `blocking`: synchronous wrappers for callers without a runtime

pub mod blocking;
pub mod config;
pub mod error;
pub mod output;
pub mod runner;
pub mod sources;
#[cfg(test)]
mod util;

pub use config::RunnerConfig;
pub use error::{BuilderError, ErrorKind};
pub use output::{
  BuildOutputResolver, BuildTargetQuery, CommandOutput, ProcessOutput, parse_output_path, resolve_built_executable,
};
pub use runner::{CommandInvocation, CommandRunner, DiagnosticSink, ProcessOutcome, TracingSink, run_builder_command};
pub use sources::{SourcePathSpec, join_sources};
