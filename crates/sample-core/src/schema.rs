//! Resolved schema types.
//!
//! A [`SchemaNode`] is an owned tree, so it is acyclic by construction.
//! Schemas loaded from YAML go through
//! [`SchemaDocument::resolve`](crate::SchemaDocument::resolve), which expands
//! named references and rejects cycles before a `SchemaNode` exists.
//!
//! ## Variants
//!
//! - `Primitive` - string, number, boolean or date with refinement constraints
//! - `Struct` - ordered fields, each required unless marked optional
//! - `Literal` - a fixed set of allowed constants
//! - `Collection` - a list of independent elements with length bounds

use crate::values::SampleValue;
use crate::{element_path, field_path, ROOT_PATH};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema loading and construction.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A chain of references leads back to one of its own ancestors
    #[error("Cyclic schema: {cycle}")]
    CyclicSchema { cycle: String },

    /// A reference names a definition that does not exist
    #[error("Unknown reference '{name}' at {path}")]
    UnknownReference { name: String, path: String },

    /// A string pattern is not a valid regular expression
    #[error("Invalid pattern '{pattern}' at {path}: {message}")]
    InvalidPattern {
        path: String,
        pattern: String,
        message: String,
    },

    /// A date bound could not be parsed
    #[error("Invalid date '{value}' at {path} (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate { path: String, value: String },

    /// Expanding references would produce more nodes than allowed
    #[error("Schema too large: expanding references exceeds {limit} nodes")]
    SchemaTooLarge { limit: usize },

    /// A struct declares the same field twice
    #[error("Duplicate field '{field}' at {path}")]
    DuplicateField { path: String, field: String },
}

/// A sample value does not conform to its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {reason}")]
pub struct ConformanceError {
    pub path: String,
    pub reason: String,
}

impl ConformanceError {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Refinements for string primitives. Lengths count characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Regular expression the value must match (search semantics, not anchored)
    pub pattern: Option<String>,
}

impl StringConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Refinements for number primitives. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Restrict values to whole numbers
    pub integer: bool,
}

impl NumberConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole numbers in `[min, max]`.
    pub fn int_between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min as f64),
            max: Some(max as f64),
            integer: true,
        }
    }

    /// Any finite number in `[min, max]`.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            integer: false,
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }
}

/// Refinements for date primitives. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateConstraints {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

impl DateConstraints {
    pub fn between(min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

// ============================================================================
// Schema Nodes
// ============================================================================

/// Primitive domain without constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Date,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// A primitive with its refinement constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    String(StringConstraints),
    Number(NumberConstraints),
    Boolean,
    Date(DateConstraints),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::String(_) => PrimitiveKind::String,
            Primitive::Number(_) => PrimitiveKind::Number,
            Primitive::Boolean => PrimitiveKind::Boolean,
            Primitive::Date(_) => PrimitiveKind::Date,
        }
    }
}

/// A constant allowed by a `Literal` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl LiteralValue {
    /// The sample value this constant produces.
    pub fn to_sample(&self) -> SampleValue {
        match self {
            LiteralValue::Boolean(b) => SampleValue::Boolean(*b),
            LiteralValue::Integer(i) => SampleValue::Integer(*i),
            LiteralValue::Number(f) => SampleValue::Number(*f),
            LiteralValue::String(s) => SampleValue::String(s.clone()),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Integer(i) => write!(f, "{i}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// A named struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub node: SchemaNode,
    pub optional: bool,
}

impl FieldSchema {
    pub fn required(name: impl Into<String>, node: SchemaNode) -> Self {
        Self {
            name: name.into(),
            node,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, node: SchemaNode) -> Self {
        Self {
            name: name.into(),
            node,
            optional: true,
        }
    }
}

/// Element schema and length bounds of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub element: Box<SchemaNode>,
    pub min_items: usize,
    /// Upper bound; generators pick a default span when absent
    pub max_items: Option<usize>,
}

/// Recursive description of a value's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(Primitive),
    Struct(Vec<FieldSchema>),
    /// Allowed constants, deduplicated, in declared order
    Literal(Vec<LiteralValue>),
    Collection(CollectionSchema),
}

impl SchemaNode {
    /// Load a schema document from a YAML file and resolve it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        crate::SchemaDocument::from_file(path)?.resolve()
    }

    /// Parse a schema document from a YAML string and resolve it.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        crate::SchemaDocument::from_yaml(yaml)?.resolve()
    }

    pub fn string(constraints: StringConstraints) -> Self {
        SchemaNode::Primitive(Primitive::String(constraints))
    }

    pub fn number(constraints: NumberConstraints) -> Self {
        SchemaNode::Primitive(Primitive::Number(constraints))
    }

    pub fn boolean() -> Self {
        SchemaNode::Primitive(Primitive::Boolean)
    }

    pub fn date(constraints: DateConstraints) -> Self {
        SchemaNode::Primitive(Primitive::Date(constraints))
    }

    pub fn structure(fields: Vec<FieldSchema>) -> Self {
        SchemaNode::Struct(fields)
    }

    /// Literal node; duplicate constants are dropped, first occurrence wins.
    pub fn literal<I: IntoIterator<Item = LiteralValue>>(values: I) -> Self {
        let mut allowed: Vec<LiteralValue> = Vec::new();
        for value in values {
            if !allowed.contains(&value) {
                allowed.push(value);
            }
        }
        SchemaNode::Literal(allowed)
    }

    pub fn collection(element: SchemaNode, min_items: usize, max_items: Option<usize>) -> Self {
        SchemaNode::Collection(CollectionSchema {
            element: Box::new(element),
            min_items,
            max_items,
        })
    }

    /// Check structural well-formedness: valid patterns and unique field names.
    ///
    /// Constraint satisfiability is not checked here; the generator reports
    /// unsatisfiable refinements when it reaches them.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_at(ROOT_PATH)
    }

    fn validate_at(&self, path: &str) -> Result<(), SchemaError> {
        match self {
            SchemaNode::Primitive(Primitive::String(c)) => {
                if let Some(pattern) = &c.pattern {
                    compile_pattern(pattern, path)?;
                }
                Ok(())
            }
            SchemaNode::Primitive(_) | SchemaNode::Literal(_) => Ok(()),
            SchemaNode::Struct(fields) => {
                let mut seen = HashSet::new();
                for field in fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(SchemaError::DuplicateField {
                            path: path.to_string(),
                            field: field.name.clone(),
                        });
                    }
                    field.node.validate_at(&field_path(path, &field.name))?;
                }
                Ok(())
            }
            SchemaNode::Collection(c) => c.element.validate_at(&element_path(path, None)),
        }
    }

    /// Verify that a value conforms to this schema.
    ///
    /// Every struct field must be present (unless optional) and no unknown
    /// field may appear; every primitive and collection constraint must hold.
    pub fn check(&self, value: &SampleValue) -> Result<(), ConformanceError> {
        self.check_at(value, ROOT_PATH)
    }

    fn check_at(&self, value: &SampleValue, path: &str) -> Result<(), ConformanceError> {
        match (self, value) {
            (SchemaNode::Primitive(Primitive::String(c)), SampleValue::String(s)) => {
                check_string(c, s, path)
            }
            (SchemaNode::Primitive(Primitive::Number(c)), SampleValue::Integer(i)) if c.integer => {
                check_number_bounds(c, *i as f64, path)
            }
            (SchemaNode::Primitive(Primitive::Number(c)), SampleValue::Number(f)) if !c.integer => {
                if !f.is_finite() {
                    return Err(ConformanceError::new(path, "number is not finite"));
                }
                check_number_bounds(c, *f, path)
            }
            (SchemaNode::Primitive(Primitive::Boolean), SampleValue::Boolean(_)) => Ok(()),
            (SchemaNode::Primitive(Primitive::Date(c)), SampleValue::Date(dt)) => {
                if c.min.is_some_and(|min| *dt < min) || c.max.is_some_and(|max| *dt > max) {
                    return Err(ConformanceError::new(path, format!("date {dt} out of range")));
                }
                Ok(())
            }
            (SchemaNode::Literal(allowed), v) => {
                if allowed.iter().any(|l| l.to_sample() == *v) {
                    Ok(())
                } else {
                    Err(ConformanceError::new(path, "value is not one of the literal values"))
                }
            }
            (SchemaNode::Struct(fields), SampleValue::Record(record)) => {
                for field in fields {
                    let child = field_path(path, &field.name);
                    match record.get(&field.name) {
                        Some(v) => field.node.check_at(v, &child)?,
                        None if field.optional => {}
                        None => return Err(ConformanceError::new(&child, "missing required field")),
                    }
                }
                for name in record.field_names() {
                    if !fields.iter().any(|f| f.name == name) {
                        return Err(ConformanceError::new(
                            &field_path(path, name),
                            "field not declared in schema",
                        ));
                    }
                }
                Ok(())
            }
            (SchemaNode::Collection(c), SampleValue::List(items)) => {
                if items.len() < c.min_items || c.max_items.is_some_and(|max| items.len() > max) {
                    return Err(ConformanceError::new(
                        path,
                        format!("collection length {} out of bounds", items.len()),
                    ));
                }
                for (i, item) in items.iter().enumerate() {
                    c.element.check_at(item, &element_path(path, Some(i)))?;
                }
                Ok(())
            }
            (node, v) => Err(ConformanceError::new(
                path,
                format!("expected {}, got {}", node.describe(), v.type_name()),
            )),
        }
    }

    /// Short human-readable description of the node's variant.
    pub fn describe(&self) -> String {
        match self {
            SchemaNode::Primitive(Primitive::Number(c)) if c.integer => "integer".to_string(),
            SchemaNode::Primitive(p) => p.kind().to_string(),
            SchemaNode::Struct(_) => "record".to_string(),
            SchemaNode::Literal(values) => {
                let names: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("one of [{}]", names.join(", "))
            }
            SchemaNode::Collection(_) => "list".to_string(),
        }
    }
}

/// Compile a string pattern, attributing failures to `path`.
pub fn compile_pattern(pattern: &str, path: &str) -> Result<Regex, SchemaError> {
    Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
        path: path.to_string(),
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn check_string(c: &StringConstraints, s: &str, path: &str) -> Result<(), ConformanceError> {
    let len = s.chars().count();
    if c.min_length.is_some_and(|min| len < min) || c.max_length.is_some_and(|max| len > max) {
        return Err(ConformanceError::new(
            path,
            format!("string length {len} out of bounds"),
        ));
    }
    if let Some(pattern) = &c.pattern {
        let re = compile_pattern(pattern, path)
            .map_err(|e| ConformanceError::new(path, e.to_string()))?;
        if !re.is_match(s) {
            return Err(ConformanceError::new(
                path,
                format!("string does not match pattern {pattern}"),
            ));
        }
    }
    Ok(())
}

fn check_number_bounds(c: &NumberConstraints, n: f64, path: &str) -> Result<(), ConformanceError> {
    if c.min.is_some_and(|min| n < min) || c.max.is_some_and(|max| n > max) {
        return Err(ConformanceError::new(path, format!("number {n} out of range")));
    }
    Ok(())
}
