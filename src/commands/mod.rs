//! Subcommand arguments and handlers.

pub mod check;
pub mod classify;
pub mod generate;

use anyhow::Context;
use sample_core::SchemaNode;
use std::path::Path;

pub use check::{run_check, CheckArgs};
pub use classify::{run_classify, ClassifyArgs};
pub use generate::{run_generate, GenerateArgs};

/// Load and resolve a schema file, naming the file in any error.
pub(crate) fn load_schema(path: &Path) -> anyhow::Result<SchemaNode> {
    SchemaNode::from_file(path).with_context(|| format!("Failed to load schema from {path:?}"))
}
