//! Collection value generators.

use super::generate_node;
use super::pattern::PatternCache;
use crate::generator::GeneratorError;
use rand::Rng;
use sample_core::{element_path, CollectionSchema, SampleValue};

/// Extra items allowed above `min_items` when no `max_items` is given.
pub const DEFAULT_COLLECTION_SPAN: usize = 5;

/// Effective inclusive length bounds, or an error when they are contradictory.
pub fn length_bounds(
    c: &CollectionSchema,
    path: &str,
) -> Result<(usize, usize), GeneratorError> {
    let min = c.min_items;
    let max = c
        .max_items
        .unwrap_or_else(|| min.saturating_add(DEFAULT_COLLECTION_SPAN));
    if min > max {
        return Err(GeneratorError::unsatisfiable(
            path,
            format!("min_items {min} is greater than max_items {max}"),
        ));
    }
    Ok((min, max))
}

/// Generate a list whose length is drawn uniformly from the bounds of `c`.
///
/// Elements are generated independently of each other.
pub fn generate_collection<R: Rng>(
    rng: &mut R,
    c: &CollectionSchema,
    patterns: &mut PatternCache,
    path: &str,
) -> Result<SampleValue, GeneratorError> {
    let (min, max) = length_bounds(c, path)?;
    let len = rng.gen_range(min..=max);
    let item_path = element_path(path, None);

    let items = (0..len)
        .map(|_| generate_node(&c.element, rng, patterns, &item_path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SampleValue::List(items))
}
