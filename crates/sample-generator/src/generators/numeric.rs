//! Numeric value generators.

use super::redraw;
use crate::generator::GeneratorError;
use rand::Rng;
use sample_core::{NumberConstraints, SampleValue};

/// Distance used for a missing bound, measured from zero or the other bound.
pub const DEFAULT_NUMBER_SPAN: f64 = 1_000_000.0;

/// Inclusive range a number is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberRange {
    Integer(i64, i64),
    Float(f64, f64),
}

/// Effective inclusive range, or an error when it is empty.
pub fn bounds(c: &NumberConstraints, path: &str) -> Result<NumberRange, GeneratorError> {
    let lo = c
        .min
        .unwrap_or_else(|| c.max.map_or(-DEFAULT_NUMBER_SPAN, |max| max.min(0.0) - DEFAULT_NUMBER_SPAN));
    let hi = c
        .max
        .unwrap_or_else(|| c.min.map_or(DEFAULT_NUMBER_SPAN, |min| min.max(0.0) + DEFAULT_NUMBER_SPAN));

    if !lo.is_finite() || !hi.is_finite() {
        return Err(GeneratorError::unsatisfiable(
            path,
            format!("numeric bounds must be finite, got [{lo}, {hi}]"),
        ));
    }
    if lo > hi {
        return Err(GeneratorError::unsatisfiable(
            path,
            format!("numeric range [{lo}, {hi}] is empty"),
        ));
    }

    if !c.integer {
        if !(hi - lo).is_finite() {
            return Err(GeneratorError::unsatisfiable(
                path,
                format!("numeric range [{lo}, {hi}] is too wide to sample"),
            ));
        }
        return Ok(NumberRange::Float(lo, hi));
    }

    let (ilo, ihi) = (lo.ceil(), hi.floor());
    if ilo > ihi || ilo > i64::MAX as f64 || ihi < i64::MIN as f64 {
        return Err(GeneratorError::unsatisfiable(
            path,
            format!("no integer in [{lo}, {hi}]"),
        ));
    }
    // `as` saturates at the i64 limits
    Ok(NumberRange::Integer(ilo as i64, ihi as i64))
}

/// Generate a number satisfying the range and integer refinement of `c`.
pub fn generate_number<R: Rng>(
    rng: &mut R,
    c: &NumberConstraints,
    path: &str,
) -> Result<SampleValue, GeneratorError> {
    match bounds(c, path)? {
        NumberRange::Integer(lo, hi) => redraw(
            rng,
            path,
            "integer",
            |rng| Some(rng.gen_range(lo..=hi)),
            |v| (lo..=hi).contains(v),
        )
        .map(SampleValue::Integer),

        NumberRange::Float(lo, hi) => redraw(
            rng,
            path,
            "number",
            |rng| Some(rng.gen_range(lo..=hi)),
            |v: &f64| v.is_finite() && (lo..=hi).contains(v),
        )
        .map(SampleValue::Number),
    }
}
