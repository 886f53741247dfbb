//! Synchronous entry points.
//!
//! Each call drives the async operation on its own current-thread runtime, so
//! callers on plain threads (a worker pool generating rules, say) can use the
//! runner without owning a runtime. A thread that is already inside a runtime
//! cannot start another one, so there the call is driven from a scoped helper
//! thread while the caller blocks.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::BuilderError;
use crate::output::{BuildOutputResolver, BuildTargetQuery, CommandOutput};
use crate::runner::{CommandInvocation, CommandRunner, DiagnosticSink, ProcessOutcome};

pub use crate::sources::join_sources;

/// Blocking form of [`crate::run_builder_command`].
pub fn run_builder_command(command_line: &str, working_dir: &Path) -> Result<ProcessOutcome, BuilderError> {
  block_on(crate::runner::run_builder_command(command_line, working_dir))?
}

/// Blocking form of [`CommandRunner::run`].
pub fn run<S: DiagnosticSink>(
  runner: &CommandRunner<S>,
  invocation: &CommandInvocation,
) -> Result<ProcessOutcome, BuilderError> {
  block_on(runner.run(invocation))?
}

/// Blocking form of [`crate::resolve_built_executable`].
pub fn resolve_built_executable(target: &str, build_root: impl Into<PathBuf>) -> Result<Option<String>, BuilderError> {
  let build_root: PathBuf = build_root.into();
  block_on(crate::output::resolve_built_executable(target, build_root))?
}

/// Blocking form of [`BuildOutputResolver::resolve`].
pub fn resolve<Q: CommandOutput>(
  resolver: &BuildOutputResolver<Q>,
  query: &BuildTargetQuery,
) -> Result<Option<String>, BuilderError> {
  block_on(resolver.resolve(query))?
}

fn block_on<F>(future: F) -> Result<F::Output, BuilderError>
where
  F: Future + Send,
  F::Output: Send,
{
  if tokio::runtime::Handle::try_current().is_err() {
    return drive(future);
  }

  std::thread::scope(|scope| scope.spawn(|| drive(future)).join())
    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

fn drive<F: Future>(future: F) -> Result<F::Output, BuilderError> {
  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .map_err(BuilderError::Runtime)?;
  Ok(runtime.block_on(future))
}
