//! Core types for testforge sample generation.
//!
//! This crate provides the foundational types shared by the generator and
//! its consumers:
//!
//! - [`SchemaNode`] - Resolved, acyclic description of a value's shape
//! - [`SchemaDocument`] - YAML form of a schema, with named definitions and references
//! - [`SampleValue`] - A concrete value conforming to a schema
//! - [`GenerationRequest`] - Schema, count and optional seed for one generation call
//! - [`codec`] - JSON encode/decode of sample values
//!
//! # Architecture
//!
//! ```text
//! schema.yaml
//!      │  SchemaDocument::from_file
//!      ▼
//! SchemaDocument ── resolve() ──► SchemaNode (acyclic, validated)
//!                                     │
//!                    sample-generator │ generate
//!                                     ▼
//!                               SampleValue ◄──► serde_json::Value (codec)
//! ```
//!
//! # Example
//!
//! ```rust
//! use sample_core::{SchemaNode, SampleValue, Record};
//!
//! let schema = SchemaNode::from_yaml(r#"
//! root:
//!   type: struct
//!   fields:
//!     - name: id
//!       type: string
//!       min_length: 1
//!     - name: age
//!       type: number
//!       integer: true
//!       min: 0
//!       max: 150
//! "#).unwrap();
//!
//! let mut record = Record::new();
//! record.insert("id", SampleValue::String("u-1".to_string()));
//! record.insert("age", SampleValue::Integer(30));
//! assert!(schema.check(&SampleValue::Record(record)).is_ok());
//! ```

pub mod codec;
pub mod document;
pub mod request;
pub mod schema;
pub mod values;

// Re-exports for convenience
pub use codec::{decode, encode, CodecError};
pub use document::{FieldDefinition, NodeDefinition, SchemaDocument, MAX_RESOLVED_NODES};
pub use request::GenerationRequest;
pub use schema::{
    CollectionSchema, ConformanceError, DateConstraints, FieldSchema, LiteralValue,
    NumberConstraints, Primitive, PrimitiveKind, SchemaError, SchemaNode, StringConstraints,
};
pub use values::{Record, SampleValue};

/// Root path used in error messages.
pub const ROOT_PATH: &str = "$";

/// Path of a struct field below `parent`.
pub fn field_path(parent: &str, field: &str) -> String {
    format!("{parent}.{field}")
}

/// Path of a collection element below `parent`; `None` for "any element".
pub fn element_path(parent: &str, index: Option<usize>) -> String {
    match index {
        Some(i) => format!("{parent}[{i}]"),
        None => format!("{parent}[]"),
    }
}
