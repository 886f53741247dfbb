//! Runner configuration.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// How long a builder command may run before it is killed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Build tool invoked for output path queries.
pub const DEFAULT_BUILD_TOOL: &str = "buck";

/// Configuration shared by the command runner and the output resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
  /// Upper bound on a single subprocess run.
  #[serde(rename = "timeout_secs", deserialize_with = "duration_from_secs")]
  pub timeout: Duration,

  /// Shell used to interpret builder command lines.
  /// If None, uses /bin/sh (Unix) or cmd.exe (Windows).
  pub shell: Option<String>,

  /// Program name of the build tool.
  pub build_tool: String,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      timeout: DEFAULT_TIMEOUT,
      shell: None,
      build_tool: DEFAULT_BUILD_TOOL.to_string(),
    }
  }
}

impl RunnerConfig {
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
    self.shell = Some(shell.into());
    self
  }

  pub fn with_build_tool(mut self, build_tool: impl Into<String>) -> Self {
    self.build_tool = build_tool.into();
    self
  }
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
  D: Deserializer<'de>,
{
  u64::deserialize(deserializer).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config() {
    let config = RunnerConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert!(config.shell.is_none());
    assert_eq!(config.build_tool, "buck");
  }

  #[test]
  fn deserialize_partial_config() {
    let config: RunnerConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.build_tool, "buck");
  }

  #[test]
  fn deserialize_full_config() {
    let config: RunnerConfig =
      serde_json::from_str(r#"{"timeout_secs": 120, "shell": "/bin/bash", "build_tool": "buck2"}"#).unwrap();
    assert_eq!(
      config,
      RunnerConfig::default()
        .with_timeout(Duration::from_secs(120))
        .with_shell("/bin/bash")
        .with_build_tool("buck2")
    );
  }

  #[test]
  fn deserialize_rejects_negative_timeout() {
    let result = serde_json::from_str::<RunnerConfig>(r#"{"timeout_secs": -1}"#);
    assert!(result.is_err());
  }
}
