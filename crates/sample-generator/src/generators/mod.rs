//! Per-variant value generators.
//!
//! This module walks a [`SchemaNode`] and dispatches each node to the
//! generator for its variant. Constrained primitives go through
//! [`redraw`], which retries a bounded number of times before reporting
//! the constraint as unsatisfiable.

pub mod collection;
pub mod numeric;
pub mod pattern;
pub mod string;
pub mod timestamp;

use crate::generator::GeneratorError;
use pattern::PatternCache;
use rand::Rng;
use sample_core::{
    element_path, field_path, Primitive, Record, SampleValue, SchemaNode,
};

/// Maximum candidates drawn for one constrained value before giving up.
pub const MAX_ATTEMPTS: usize = 100;

/// Draw candidates until one is accepted, at most [`MAX_ATTEMPTS`] times.
///
/// `draw` may return `None` for a candidate that could not be built at all.
pub fn redraw<R, T, D, A>(
    rng: &mut R,
    path: &str,
    what: &str,
    mut draw: D,
    accept: A,
) -> Result<T, GeneratorError>
where
    R: Rng,
    D: FnMut(&mut R) -> Option<T>,
    A: Fn(&T) -> bool,
{
    for attempt in 1..=MAX_ATTEMPTS {
        if let Some(candidate) = draw(&mut *rng) {
            if accept(&candidate) {
                return Ok(candidate);
            }
        }
        tracing::trace!(path, attempt, "{what} candidate rejected");
    }
    Err(GeneratorError::unsatisfiable(
        path,
        format!("no {what} satisfied the constraints after {MAX_ATTEMPTS} attempts"),
    ))
}

/// Generate one value for `node`.
pub fn generate_node<R: Rng>(
    node: &SchemaNode,
    rng: &mut R,
    patterns: &mut PatternCache,
    path: &str,
) -> Result<SampleValue, GeneratorError> {
    match node {
        SchemaNode::Primitive(Primitive::String(c)) => {
            string::generate_string(rng, c, patterns, path)
        }

        SchemaNode::Primitive(Primitive::Number(c)) => numeric::generate_number(rng, c, path),

        SchemaNode::Primitive(Primitive::Boolean) => Ok(SampleValue::Boolean(rng.gen_bool(0.5))),

        SchemaNode::Primitive(Primitive::Date(c)) => timestamp::generate_date(rng, c, path),

        SchemaNode::Literal(values) => {
            if values.is_empty() {
                return Err(GeneratorError::unsatisfiable(path, "literal set is empty"));
            }
            let idx = rng.gen_range(0..values.len());
            Ok(values[idx].to_sample())
        }

        SchemaNode::Struct(fields) => {
            let mut record = Record::with_capacity(fields.len());
            for field in fields {
                if field.optional && !rng.gen_bool(0.5) {
                    continue;
                }
                let value =
                    generate_node(&field.node, rng, patterns, &field_path(path, &field.name))?;
                record.insert(field.name.clone(), value);
            }
            Ok(SampleValue::Record(record))
        }

        SchemaNode::Collection(c) => collection::generate_collection(rng, c, patterns, path),
    }
}

/// Reject refinements that admit no value, before anything is drawn.
///
/// Every node is visited, including optional fields and elements of
/// collections that may end up empty, so the outcome does not depend on the
/// sample count or on the random stream. Pattern constraints can only be
/// judged by drawing and are left to [`redraw`].
pub fn precheck(node: &SchemaNode, path: &str) -> Result<(), GeneratorError> {
    match node {
        SchemaNode::Primitive(Primitive::String(c)) => string::length_bounds(c, path).map(|_| ()),
        SchemaNode::Primitive(Primitive::Number(c)) => numeric::bounds(c, path).map(|_| ()),
        SchemaNode::Primitive(Primitive::Boolean) => Ok(()),
        SchemaNode::Primitive(Primitive::Date(c)) => timestamp::bounds(c, path).map(|_| ()),
        SchemaNode::Literal(values) if values.is_empty() => {
            Err(GeneratorError::unsatisfiable(path, "literal set is empty"))
        }
        SchemaNode::Literal(_) => Ok(()),
        SchemaNode::Struct(fields) => fields
            .iter()
            .try_for_each(|f| precheck(&f.node, &field_path(path, &f.name))),
        SchemaNode::Collection(c) => {
            collection::length_bounds(c, path)?;
            precheck(&c.element, &element_path(path, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sample_core::{FieldSchema, LiteralValue, NumberConstraints, StringConstraints};

    #[test]
    fn test_redraw_gives_up_after_max_attempts() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut calls = 0;
        let result: Result<u32, _> = redraw(
            &mut rng,
            "$.x",
            "number",
            |_| {
                calls += 1;
                Some(1)
            },
            |_| false,
        );

        assert_eq!(calls, MAX_ATTEMPTS);
        match result {
            Err(GeneratorError::UnsatisfiableConstraint { path, .. }) => assert_eq!(path, "$.x"),
            other => panic!("Expected UnsatisfiableConstraint, got {other:?}"),
        }
    }

    #[test]
    fn test_redraw_returns_first_accepted() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut next = 0;
        let value = redraw(
            &mut rng,
            "$",
            "number",
            |_| {
                next += 1;
                Some(next)
            },
            |v| *v == 3,
        )
        .unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_literal_draws_from_allowed_set() {
        let node = SchemaNode::literal(vec![
            LiteralValue::String("red".to_string()),
            LiteralValue::String("green".to_string()),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut patterns = PatternCache::new();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let v = generate_node(&node, &mut rng, &mut patterns, "$").unwrap();
            seen.insert(v.as_str().unwrap().to_string());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_struct_fields_in_declared_order() {
        let node = SchemaNode::structure(vec![
            FieldSchema::required("z", SchemaNode::boolean()),
            FieldSchema::required("a", SchemaNode::number(NumberConstraints::int_between(1, 2))),
            FieldSchema::required("m", SchemaNode::string(StringConstraints::new())),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut patterns = PatternCache::new();

        let value = generate_node(&node, &mut rng, &mut patterns, "$").unwrap();
        assert_eq!(value.as_record().unwrap().field_names(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_optional_fields_sometimes_absent() {
        let node = SchemaNode::structure(vec![FieldSchema::optional("maybe", SchemaNode::boolean())]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut patterns = PatternCache::new();

        let present = (0..200)
            .filter(|_| {
                let v = generate_node(&node, &mut rng, &mut patterns, "$").unwrap();
                v.as_record().unwrap().contains("maybe")
            })
            .count();
        assert!(present > 0 && present < 200);
    }

    #[test]
    fn test_precheck_reaches_optional_fields() {
        let node = SchemaNode::structure(vec![FieldSchema::optional(
            "code",
            SchemaNode::string(StringConstraints::new().with_min_length(5).with_max_length(3)),
        )]);
        match precheck(&node, "$") {
            Err(GeneratorError::UnsatisfiableConstraint { path, .. }) => assert_eq!(path, "$.code"),
            other => panic!("Expected UnsatisfiableConstraint, got {other:?}"),
        }
    }

    #[test]
    fn test_precheck_rejects_empty_literal() {
        assert!(precheck(&SchemaNode::Literal(vec![]), "$").is_err());
    }
}
