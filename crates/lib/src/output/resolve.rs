//! Resolving the on-disk output of a built target.
//!
//! `buck build --show-json-output <target>` prints a single JSON object that
//! maps each built target to its output path:
//!
//! ```json
//! {"//app:bin": "buck-out/gen/app/bin"}
//! ```

use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::RunnerConfig;
use crate::error::BuilderError;
use crate::output::query::{CommandOutput, ProcessOutput};
use crate::runner::DiagnosticSink;

/// A target whose output path should be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTargetQuery {
  /// Fully qualified target, e.g. `//tools/gen:thrift_builder`.
  pub target: String,
  /// Directory the build tool runs in.
  pub build_root: PathBuf,
}

impl BuildTargetQuery {
  pub fn new(target: impl Into<String>, build_root: impl Into<PathBuf>) -> Self {
    Self {
      target: target.into(),
      build_root: build_root.into(),
    }
  }
}

/// Asks the build tool where it put a target's output.
#[derive(Debug, Clone)]
pub struct BuildOutputResolver<Q = ProcessOutput> {
  build_tool: String,
  query: Q,
}

impl BuildOutputResolver<ProcessOutput> {
  pub fn new(config: &RunnerConfig) -> Self {
    Self::with_query(config.build_tool.clone(), ProcessOutput::new(config.timeout))
  }
}

impl<S: DiagnosticSink> BuildOutputResolver<ProcessOutput<S>> {
  /// Resolve through the build tool, sending its stderr to `sink` when it fails.
  pub fn with_sink(config: &RunnerConfig, sink: S) -> Self {
    Self::with_query(config.build_tool.clone(), ProcessOutput::with_sink(config.timeout, sink))
  }
}

impl Default for BuildOutputResolver<ProcessOutput> {
  fn default() -> Self {
    Self::new(&RunnerConfig::default())
  }
}

impl<Q: CommandOutput> BuildOutputResolver<Q> {
  pub fn with_query(build_tool: impl Into<String>, query: Q) -> Self {
    Self {
      build_tool: build_tool.into(),
      query,
    }
  }

  /// Build `query.target` and return the path the build tool reports for it,
  /// or `None` if the response has no entry for the target.
  ///
  /// The path is returned as printed; whether it exists is not checked.
  pub async fn resolve(&self, query: &BuildTargetQuery) -> Result<Option<String>, BuilderError> {
    let response = self
      .query
      .stdout(
        &query.build_root,
        &self.build_tool,
        &["build", "--show-json-output", query.target.as_str()],
      )
      .await?;

    let path = parse_output_path(&response, &query.target)?;
    debug!(target = %query.target, path = ?path, "resolved build output");
    Ok(path)
  }
}

/// Resolve a target's output with the default build tool and timeout.
pub async fn resolve_built_executable(
  target: &str,
  build_root: impl Into<PathBuf>,
) -> Result<Option<String>, BuilderError> {
  BuildOutputResolver::new(&RunnerConfig::default())
    .resolve(&BuildTargetQuery::new(target, build_root))
    .await
}

/// Look up `target` in a `--show-json-output` response.
///
/// The whole response must be one JSON object. String values are returned
/// as-is, numbers and booleans as their JSON text; anything else is rejected.
pub fn parse_output_path(response: &[u8], target: &str) -> Result<Option<String>, BuilderError> {
  let mut outputs: Map<String, Value> = serde_json::from_slice(response)?;

  match outputs.remove(target) {
    None => Ok(None),
    Some(Value::String(path)) => Ok(Some(path)),
    Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(value.to_string())),
    Some(value) => Err(BuilderError::NonScalarOutput {
      target: target.to_string(),
      value: value.to_string(),
    }),
  }
}
