//! Schema-driven sample generator for testforge.
//!
//! This crate provides the [`SampleGenerator`], which turns a
//! [`SchemaNode`](sample_core::SchemaNode) into structurally valid sample
//! values. Seeded runs are reproducible: the same schema, count and seed
//! always produce the same samples.
//!
//! # Architecture
//!
//! ```text
//! SchemaNode ──► precheck (static satisfiability)
//!      │
//!      ▼
//! ┌──────────────────────┐
//! │   SampleGenerator    │
//! │                      │
//! │  seeded:   StdRng    │  one stream per element,
//! │            per index │  seed + i * 0x9E3779B97F4A7C15
//! │  unseeded: Mutex<    │
//! │            StdRng>   │
//! └──────────┬───────────┘
//!            │ generate_node (recursive descent)
//!            ▼
//!      Vec<SampleValue>
//! ```
//!
//! # Example
//!
//! ```rust
//! use sample_core::{FieldSchema, NumberConstraints, SchemaNode, StringConstraints};
//! use sample_generator::SampleGenerator;
//!
//! let schema = SchemaNode::structure(vec![
//!     FieldSchema::required("id", SchemaNode::string(StringConstraints::new().with_min_length(1))),
//!     FieldSchema::required("age", SchemaNode::number(NumberConstraints::int_between(0, 150))),
//! ]);
//!
//! let generator = SampleGenerator::new();
//! let samples = generator.generate(&schema, 3, Some(42)).unwrap();
//! assert_eq!(samples, generator.generate(&schema, 3, Some(42)).unwrap());
//! ```
//!
//! # Retry bound
//!
//! Constrained values are redrawn at most [`MAX_ATTEMPTS`] times. When
//! every candidate is rejected the call fails with
//! [`GeneratorError::UnsatisfiableConstraint`] instead of looping forever.

pub mod generator;
pub mod generators;

use sample_core::{SampleValue, SchemaNode};
use std::sync::OnceLock;

// Re-exports for convenience
pub use generator::{element_seed, GeneratorError, SampleGenerator, SampleIter};
pub use generators::MAX_ATTEMPTS;

static DEFAULT_GENERATOR: OnceLock<SampleGenerator> = OnceLock::new();

/// The process-wide generator, seeded from OS entropy on first use.
pub fn default_generator() -> &'static SampleGenerator {
    DEFAULT_GENERATOR.get_or_init(SampleGenerator::new)
}

/// Generate `count` samples with the process-wide generator.
pub fn generate(
    schema: &SchemaNode,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<SampleValue>, GeneratorError> {
    default_generator().generate(schema, count, seed)
}
