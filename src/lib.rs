//! testforge library
//!
//! Command handlers behind the `testforge` binary, on top of three crates:
//!
//! - `test_kind` - classify test files as unit, integration, e2e or test implementation
//! - `sample_core` - schema documents, sample values and their JSON codec
//! - `sample_generator` - seeded, schema-driven sample generation
//!
//! # CLI Usage
//!
//! ```bash
//! # Route test files by kind
//! testforge classify src/payment.test-impl.ts src/orders.integration.ts
//!
//! # Generate three reproducible fixtures
//! testforge generate --schema user.yaml --count 3 --seed 42
//!
//! # Check fixtures written by hand against the schema
//! testforge check --schema user.yaml --input fixtures.json
//! ```

pub mod commands;

pub use sample_core;
pub use sample_generator;
pub use test_kind;
