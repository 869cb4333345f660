//! Generation requests.

use crate::document::SchemaDocument;
use crate::schema::{SchemaError, SchemaNode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One generation call: a schema, how many samples and an optional seed.
///
/// Requests can be kept as YAML next to the fixtures they produce:
///
/// ```yaml
/// count: 3
/// seed: 42
/// schema:
///   root:
///     type: boolean
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub schema: SchemaDocument,

    pub count: usize,

    /// Fixed seed for reproducible output; omitted means non-deterministic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GenerationRequest {
    pub fn new(schema: SchemaDocument, count: usize, seed: Option<u64>) -> Self {
        Self {
            schema,
            count,
            seed,
        }
    }

    /// Load a request from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a request from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Resolve the request's schema document.
    pub fn resolve_schema(&self) -> Result<SchemaNode, SchemaError> {
        self.schema.resolve()
    }
}
