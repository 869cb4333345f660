//! YAML schema documents.
//!
//! A document has a `root` node and optional named `definitions` that
//! nodes can point at with `type: ref` and `ref: <name>`. [`SchemaDocument::resolve`] expands
//! the references into an owned [`SchemaNode`] tree. This is the only place
//! a cycle can be expressed, so it is also where cycles are rejected.
//!
//! ```yaml
//! version: 1
//! definitions:
//!   money:
//!     type: number
//!     min: 0
//! root:
//!   type: struct
//!   fields:
//!     - name: id
//!       type: string
//!       min_length: 1
//!     - name: total
//!       type: ref
//!       ref: money
//!       optional: true
//! ```

use crate::schema::{
    CollectionSchema, DateConstraints, FieldSchema, LiteralValue, NumberConstraints, Primitive,
    SchemaError, SchemaNode, StringConstraints,
};
use crate::{element_path, field_path, ROOT_PATH};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Largest number of nodes a resolved schema may expand to.
///
/// Definitions shared through several references are copied at every use,
/// so a short document can describe an exponentially large tree.
pub const MAX_RESOLVED_NODES: usize = 100_000;

fn default_version() -> u32 {
    1
}

/// Reference stack and node count while a document is being expanded.
#[derive(Default)]
struct Expansion {
    stack: Vec<String>,
    nodes: usize,
}

/// Unresolved node as written in a schema file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDefinition {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },

    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default)]
        integer: bool,
    },

    Boolean,

    Date {
        /// Lower bound (RFC 3339 or YYYY-MM-DD)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<String>,
        /// Upper bound (RFC 3339 or YYYY-MM-DD)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<String>,
    },

    Struct {
        fields: Vec<FieldDefinition>,
    },

    Literal {
        values: Vec<LiteralValue>,
    },

    Collection {
        element: Box<NodeDefinition>,
        #[serde(default)]
        min_items: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_items: Option<usize>,
    },

    /// Reference to an entry of the document's `definitions`
    Ref {
        #[serde(rename = "ref")]
        name: String,
    },
}

/// Struct field as written in a schema file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDefinition {
    pub name: String,

    #[serde(flatten)]
    pub node: NodeDefinition,

    #[serde(default)]
    pub optional: bool,
}

/// A schema file: root node plus named definitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDocument {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Named nodes reachable through `type: ref`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, NodeDefinition>,

    /// The node samples are generated from
    pub root: NodeDefinition,
}

impl SchemaDocument {
    /// Create a document without definitions.
    pub fn new(root: NodeDefinition) -> Self {
        Self {
            version: default_version(),
            definitions: BTreeMap::new(),
            root,
        }
    }

    /// Load a document from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Expand references and validate, producing an acyclic [`SchemaNode`].
    pub fn resolve(&self) -> Result<SchemaNode, SchemaError> {
        let mut expansion = Expansion::default();
        let node = self.resolve_node(&self.root, ROOT_PATH, &mut expansion)?;
        node.validate()?;
        Ok(node)
    }

    /// Resolve a single named definition as if it were the root.
    pub fn resolve_definition(&self, name: &str) -> Result<SchemaNode, SchemaError> {
        let mut expansion = Expansion::default();
        let node = self.resolve_ref(name, ROOT_PATH, &mut expansion)?;
        node.validate()?;
        Ok(node)
    }

    fn resolve_ref(
        &self,
        name: &str,
        path: &str,
        expansion: &mut Expansion,
    ) -> Result<SchemaNode, SchemaError> {
        if let Some(pos) = expansion.stack.iter().position(|n| n == name) {
            let mut cycle: Vec<&str> = expansion.stack[pos..]
                .iter()
                .map(String::as_str)
                .collect();
            cycle.push(name);
            return Err(SchemaError::CyclicSchema {
                cycle: cycle.join(" -> "),
            });
        }

        let definition =
            self.definitions
                .get(name)
                .ok_or_else(|| SchemaError::UnknownReference {
                    name: name.to_string(),
                    path: path.to_string(),
                })?;

        expansion.stack.push(name.to_string());
        let resolved = self.resolve_node(definition, path, expansion);
        expansion.stack.pop();
        resolved
    }

    fn resolve_node(
        &self,
        def: &NodeDefinition,
        path: &str,
        expansion: &mut Expansion,
    ) -> Result<SchemaNode, SchemaError> {
        expansion.nodes += 1;
        if expansion.nodes > MAX_RESOLVED_NODES {
            return Err(SchemaError::SchemaTooLarge {
                limit: MAX_RESOLVED_NODES,
            });
        }

        let node = match def {
            NodeDefinition::String {
                min_length,
                max_length,
                pattern,
            } => SchemaNode::Primitive(Primitive::String(StringConstraints {
                min_length: *min_length,
                max_length: *max_length,
                pattern: pattern.clone(),
            })),

            NodeDefinition::Number { min, max, integer } => {
                SchemaNode::Primitive(Primitive::Number(NumberConstraints {
                    min: *min,
                    max: *max,
                    integer: *integer,
                }))
            }

            NodeDefinition::Boolean => SchemaNode::boolean(),

            NodeDefinition::Date { min, max } => SchemaNode::date(DateConstraints {
                min: min.as_deref().map(|s| parse_date_bound(s, path)).transpose()?,
                max: max.as_deref().map(|s| parse_date_bound(s, path)).transpose()?,
            }),

            NodeDefinition::Struct { fields } => {
                let mut resolved = Vec::with_capacity(fields.len());
                for field in fields {
                    let child = field_path(path, &field.name);
                    resolved.push(FieldSchema {
                        name: field.name.clone(),
                        node: self.resolve_node(&field.node, &child, expansion)?,
                        optional: field.optional,
                    });
                }
                SchemaNode::Struct(resolved)
            }

            NodeDefinition::Literal { values } => SchemaNode::literal(values.iter().cloned()),

            NodeDefinition::Collection {
                element,
                min_items,
                max_items,
            } => SchemaNode::Collection(CollectionSchema {
                element: Box::new(self.resolve_node(element, &element_path(path, None), expansion)?),
                min_items: *min_items,
                max_items: *max_items,
            }),

            NodeDefinition::Ref { name } => self.resolve_ref(name, path, expansion)?,
        };
        Ok(node)
    }
}

/// Parse a date bound in RFC 3339 or `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

fn parse_date_bound(s: &str, path: &str) -> Result<DateTime<Utc>, SchemaError> {
    parse_date(s).ok_or_else(|| SchemaError::InvalidDate {
        path: path.to_string(),
        value: s.to_string(),
    })
}
