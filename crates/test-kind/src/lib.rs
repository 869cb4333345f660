//! Test-kind classification for test source files.
//!
//! Test files are routed by a naming convention: the marker before the
//! final extension decides which kind of test a file holds.
//!
//! ```text
//! payment.test-impl.ts   ──► TestImplementation
//! orders.integration.ts  ──► Integration
//! checkout.spec.ts       ──► E2E
//! pricing.test.ts        ──► Unit
//! orders.handler.ts      ──► UnrecognizedKind
//! ```
//!
//! Classification is pure string matching. The classifier never opens or
//! stats the path it is given.
//!
//! # Example
//!
//! ```rust
//! use test_kind::{classify, Classifier, TestKind};
//!
//! assert_eq!(classify("src/payment.test-impl.ts").unwrap(), TestKind::TestImplementation);
//! assert!(classify("src/orders.handler.ts").is_err());
//!
//! let classifier = Classifier::with_extensions(["ts", "tsx"]);
//! assert_eq!(classifier.classify("ui/Cart.test.tsx").unwrap(), TestKind::Unit);
//! ```

pub mod classifier;
pub mod kind;

// Re-exports for convenience
pub use classifier::{classify, ClassifyError, Classifier, DEFAULT_EXTENSIONS};
pub use kind::{ParseTestKindError, TestKind};
