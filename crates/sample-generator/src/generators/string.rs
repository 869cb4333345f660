//! String value generators.

use super::pattern::PatternCache;
use super::redraw;
use crate::generator::GeneratorError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sample_core::{SampleValue, StringConstraints};

/// Extra length allowed above `min_length` when no `max_length` is given.
pub const DEFAULT_STRING_SPAN: usize = 16;

/// Smallest repetition cap used when sampling from a pattern.
const MIN_PATTERN_REPEAT: usize = 8;

/// Effective inclusive length bounds for an unpatterned string, or an error
/// when the declared bounds are contradictory.
pub fn length_bounds(
    c: &StringConstraints,
    path: &str,
) -> Result<(usize, usize), GeneratorError> {
    let min = c.min_length.unwrap_or(0);
    let max = c
        .max_length
        .unwrap_or_else(|| min.saturating_add(DEFAULT_STRING_SPAN));
    if min > max {
        return Err(GeneratorError::unsatisfiable(
            path,
            format!("min_length {min} is greater than max_length {max}"),
        ));
    }
    Ok((min, max))
}

/// Generate a string satisfying the length bounds and pattern of `c`.
///
/// The default span only applies to unpatterned strings; a pattern string
/// is limited by an explicit `max_length` alone.
pub fn generate_string<R: Rng>(
    rng: &mut R,
    c: &StringConstraints,
    patterns: &mut PatternCache,
    path: &str,
) -> Result<SampleValue, GeneratorError> {
    let (min, max) = length_bounds(c, path)?;

    let value = match &c.pattern {
        None => redraw(
            rng,
            path,
            "string",
            |rng| Some(random_alphanumeric(rng, min, max)),
            |s: &String| (min..=max).contains(&s.chars().count()),
        )?,
        Some(pattern) => {
            let compiled = patterns.compiled(pattern, path)?;
            let upper = c.max_length.unwrap_or(usize::MAX);
            let max_extra = u32::try_from(max.max(MIN_PATTERN_REPEAT)).unwrap_or(u32::MAX);
            redraw(
                rng,
                path,
                "pattern string",
                |rng| compiled.sample(rng, max_extra),
                |s: &String| (min..=upper).contains(&s.chars().count()) && compiled.is_match(s),
            )?
        }
    };

    Ok(SampleValue::String(value))
}

/// Alphanumeric string with a length drawn uniformly from `[min, max]`.
fn random_alphanumeric<R: Rng>(rng: &mut R, min: usize, max: usize) -> String {
    let len = rng.gen_range(min..=max);
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(c: &StringConstraints, seed: u64) -> Result<String, GeneratorError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut patterns = PatternCache::new();
        generate_string(&mut rng, c, &mut patterns, "$")
            .map(|v| v.as_str().unwrap().to_string())
    }

    #[test]
    fn test_length_bounds_defaults() {
        assert_eq!(
            length_bounds(&StringConstraints::new(), "$").unwrap(),
            (0, DEFAULT_STRING_SPAN)
        );
        assert_eq!(
            length_bounds(&StringConstraints::new().with_min_length(4), "$").unwrap(),
            (4, 4 + DEFAULT_STRING_SPAN)
        );
    }

    #[test]
    fn test_min_greater_than_max_is_unsatisfiable() {
        let c = StringConstraints::new().with_min_length(5).with_max_length(3);
        assert!(matches!(
            generate(&c, 42),
            Err(GeneratorError::UnsatisfiableConstraint { .. })
        ));
    }

    #[test]
    fn test_plain_string_within_bounds() {
        let c = StringConstraints::new().with_min_length(2).with_max_length(6);
        for seed in 0..50 {
            let s = generate(&c, seed).unwrap();
            assert!((2..=6).contains(&s.len()));
            assert!(s.chars().all(|ch| ch.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_exact_length() {
        let c = StringConstraints::new().with_min_length(3).with_max_length(3);
        assert_eq!(generate(&c, 1).unwrap().len(), 3);
    }

    #[test]
    fn test_pattern_with_length_bounds() {
        let c = StringConstraints::new()
            .with_pattern("^[a-z]+$")
            .with_min_length(10)
            .with_max_length(12);
        for seed in 0..20 {
            let s = generate(&c, seed).unwrap();
            assert!((10..=12).contains(&s.len()), "{s}");
            assert!(s.chars().all(|ch| ch.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_pattern_conflicting_with_length_is_unsatisfiable() {
        let c = StringConstraints::new()
            .with_pattern("^[0-9]{3}$")
            .with_min_length(5);
        match generate(&c, 42) {
            Err(GeneratorError::UnsatisfiableConstraint { reason, .. }) => {
                assert!(reason.contains("after 100 attempts"));
            }
            other => panic!("Expected UnsatisfiableConstraint, got {other:?}"),
        }
    }

    #[test]
    fn test_long_pattern_without_length_bounds() {
        let uuid = "^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
        let s = generate(&StringConstraints::new().with_pattern(uuid), 42).unwrap();
        assert_eq!(s.len(), 36);

        let s = generate(&StringConstraints::new().with_pattern("^[a-z]{20}$"), 42).unwrap();
        assert_eq!(s.len(), 20);
    }

    #[test]
    fn test_huge_min_length_does_not_overflow() {
        let c = StringConstraints::new().with_min_length(usize::MAX);
        assert_eq!(length_bounds(&c, "$").unwrap(), (usize::MAX, usize::MAX));
    }

    #[test]
    fn test_seeded_strings_are_deterministic() {
        let c = StringConstraints::new().with_pattern(r"^user_[a-z]{4}@example\.com$");
        assert_eq!(generate(&c, 9).unwrap(), generate(&c, 9).unwrap());
    }
}
