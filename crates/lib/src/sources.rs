//! Source path assembly for generated build rules.
//!
//! Builder commands take their inputs as one space-separated argument string.
//! The sources of a rule are relative to the rule's base path, which is itself
//! relative to the cell root.

use std::path::{Path, PathBuf};

/// Sources of a single rule, as declared in the build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePathSpec {
  /// Cell root. Defaults to the current directory when absent.
  pub cell_path: Option<String>,
  /// Directory of the build file, relative to the cell root.
  pub base_path: String,
  /// Source names relative to `base_path`, in declaration order.
  pub sources: Vec<String>,
}

impl SourcePathSpec {
  pub fn new(cell_path: Option<&str>, base_path: &str, sources: Vec<String>) -> Self {
    Self {
      cell_path: cell_path.map(str::to_string),
      base_path: base_path.to_string(),
      sources,
    }
  }

  /// Space-separated, normalized paths of all sources.
  pub fn joined(&self) -> String {
    join_sources(self.cell_path.as_deref(), &self.base_path, &self.sources)
  }
}

/// Prefix every source with `cell_path/base_path` and join them with spaces.
///
/// Order is preserved and duplicates are kept. Paths are normalized lexically
/// (see [`normalize`]); nothing touches the filesystem.
///
/// ```
/// # use genrule_lib::join_sources;
/// # #[cfg(unix)]
/// assert_eq!(
///   join_sources(Some("/cell"), "app", &["main.py", "lib/util.py"]),
///   "/cell/app/main.py /cell/app/lib/util.py"
/// );
/// ```
pub fn join_sources<S: AsRef<str>>(cell_path: Option<&str>, base_path: &str, sources: &[S]) -> String {
  let prefix = normalize(&Path::new(cell_path.unwrap_or(".")).join(base_path));
  sources
    .iter()
    .map(|source| normalize(&prefix.join(source.as_ref())).to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Collapse repeated separators, trailing separators and interior `.` segments.
///
/// A leading `.` is kept so relative paths stay visibly relative, and `..` is
/// left alone: resolving it lexically is wrong when symlinks are involved.
fn normalize(path: &Path) -> PathBuf {
  path.components().collect()
}
