//! Build output path resolution.

pub mod query;
pub mod resolve;

pub use query::{CommandOutput, ProcessOutput};
pub use resolve::{BuildOutputResolver, BuildTargetQuery, parse_output_path, resolve_built_executable};
