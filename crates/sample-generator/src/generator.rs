//! Main sample generator.

use crate::generators::pattern::PatternCache;
use crate::generators::{generate_node, precheck};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sample_core::{
    GenerationRequest, SampleValue, SchemaDocument, SchemaError, SchemaNode, ROOT_PATH,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A refinement admits no value within the retry budget
    #[error("Unsatisfiable constraint at {path}: {reason}")]
    UnsatisfiableConstraint { path: String, reason: String },

    /// Schema error (cyclic, unknown reference, invalid pattern, ...)
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),
}

impl GeneratorError {
    pub(crate) fn unsatisfiable(path: &str, reason: impl Into<String>) -> Self {
        GeneratorError::UnsatisfiableConstraint {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error reports a reference cycle in the schema.
    pub fn is_cyclic(&self) -> bool {
        matches!(
            self,
            GeneratorError::SchemaError(SchemaError::CyclicSchema { .. })
        )
    }
}

/// Seed of the stream used for the element at `index` of a seeded run.
///
/// Every element gets its own stream, so a shorter run is a prefix of a
/// longer one and any element can be reproduced on its own.
pub fn element_seed(seed: u64, index: u64) -> u64 {
    seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
}

/// Schema-driven sample generator.
///
/// Seeded calls derive fresh streams from the seed and never touch the
/// shared stream, so they are reproducible under any interleaving of calls.
/// Unseeded calls draw from the shared stream, which stays locked for the
/// whole call.
pub struct SampleGenerator {
    shared: Mutex<StdRng>,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleGenerator {
    /// Create a generator whose shared stream is seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            shared: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a generator whose shared stream starts from `seed`.
    ///
    /// Unseeded calls then form a reproducible sequence for this generator.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            shared: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Reset the shared stream.
    pub fn reseed(&self, seed: u64) {
        *self.lock_shared() = StdRng::seed_from_u64(seed);
    }

    /// Generate `count` samples for `schema`.
    ///
    /// With a seed, identical `(schema, count, seed)` produce identical output.
    pub fn generate(
        &self,
        schema: &SchemaNode,
        count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<SampleValue>, GeneratorError> {
        tracing::debug!(count, ?seed, "Generating samples");
        self.samples(schema, count, seed)?.collect()
    }

    /// Resolve a schema document and generate from it.
    ///
    /// Reference cycles surface here as a `CyclicSchema` schema error.
    pub fn generate_document(
        &self,
        document: &SchemaDocument,
        count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<SampleValue>, GeneratorError> {
        let schema = document.resolve()?;
        self.generate(&schema, count, seed)
    }

    /// Run a [`GenerationRequest`].
    pub fn generate_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<SampleValue>, GeneratorError> {
        self.generate_document(&request.schema, request.count, request.seed)
    }

    /// Reproduce the element at `index` of a run seeded with `seed`.
    pub fn nth(
        &self,
        schema: &SchemaNode,
        seed: u64,
        index: u64,
    ) -> Result<SampleValue, GeneratorError> {
        prepare(schema)?;
        let mut rng = StdRng::seed_from_u64(element_seed(seed, index));
        generate_node(schema, &mut rng, &mut PatternCache::new(), ROOT_PATH)
    }

    /// Lazily generate `count` samples.
    ///
    /// The schema is validated and prechecked before the iterator is
    /// returned. An unseeded iterator holds the shared stream until dropped.
    pub fn samples<'a>(
        &'a self,
        schema: &'a SchemaNode,
        count: usize,
        seed: Option<u64>,
    ) -> Result<SampleIter<'a>, GeneratorError> {
        prepare(schema)?;

        let source = match seed {
            Some(seed) => Source::Seeded(seed),
            None => Source::Shared(self.lock_shared()),
        };

        Ok(SampleIter {
            schema,
            source,
            patterns: PatternCache::new(),
            index: 0,
            remaining: count,
        })
    }

    fn lock_shared(&self) -> MutexGuard<'_, StdRng> {
        // A poisoned stream is still a valid stream
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Structural validation plus static satisfiability, shared by every entry point.
fn prepare(schema: &SchemaNode) -> Result<(), GeneratorError> {
    schema.validate()?;
    precheck(schema, ROOT_PATH)
}

enum Source<'a> {
    Seeded(u64),
    Shared(MutexGuard<'a, StdRng>),
}

/// Iterator that lazily generates samples.
///
/// After the first error the iterator is exhausted, so `size_hint` only
/// gives an upper bound.
pub struct SampleIter<'a> {
    schema: &'a SchemaNode,
    source: Source<'a>,
    patterns: PatternCache,
    index: u64,
    remaining: usize,
}

impl SampleIter<'_> {
    /// Index of the next element.
    pub fn current_index(&self) -> u64 {
        self.index
    }
}

impl Iterator for SampleIter<'_> {
    type Item = Result<SampleValue, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let result = match &mut self.source {
            Source::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(element_seed(*seed, self.index));
                generate_node(self.schema, &mut rng, &mut self.patterns, ROOT_PATH)
            }
            Source::Shared(rng) => {
                generate_node(self.schema, &mut **rng, &mut self.patterns, ROOT_PATH)
            }
        };

        self.index += 1;
        self.remaining = match result {
            Ok(_) => self.remaining - 1,
            Err(_) => 0,
        };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
