//! Date value generators.

use super::redraw;
use crate::generator::GeneratorError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;
use sample_core::{DateConstraints, SampleValue};

/// Days between a given bound and the default for a missing one.
pub const DEFAULT_DATE_SPAN_DAYS: i64 = 3650;

/// Default lower bound: 2000-01-01T00:00:00Z.
pub fn default_min() -> DateTime<Utc> {
    Utc.timestamp_opt(946_684_800, 0).single().unwrap_or_default()
}

/// Default upper bound: 2030-12-31T23:59:59Z.
pub fn default_max() -> DateTime<Utc> {
    Utc.timestamp_opt(1_924_991_999, 0).single().unwrap_or_default()
}

/// Effective inclusive range in whole Unix seconds.
pub fn bounds(c: &DateConstraints, path: &str) -> Result<(i64, i64), GeneratorError> {
    let span = Duration::days(DEFAULT_DATE_SPAN_DAYS);
    let lo = c.min.unwrap_or_else(|| match c.max {
        Some(max) if max < default_min() => max - span,
        _ => default_min(),
    });
    let hi = c.max.unwrap_or_else(|| if lo > default_max() { lo + span } else { default_max() });

    // Round the lower bound up to a whole second
    let lo_secs = lo.timestamp() + i64::from(lo.timestamp_subsec_nanos() > 0);
    let hi_secs = hi.timestamp();
    if lo_secs > hi_secs {
        return Err(GeneratorError::unsatisfiable(
            path,
            format!("date range [{lo}, {hi}] is empty"),
        ));
    }
    Ok((lo_secs, hi_secs))
}

/// Generate a whole-second timestamp within the bounds of `c`.
pub fn generate_date<R: Rng>(
    rng: &mut R,
    c: &DateConstraints,
    path: &str,
) -> Result<SampleValue, GeneratorError> {
    let (lo, hi) = bounds(c, path)?;
    redraw(
        rng,
        path,
        "date",
        |rng| DateTime::from_timestamp(rng.gen_range(lo..=hi), 0),
        |dt| c.min.map_or(true, |min| *dt >= min) && c.max.map_or(true, |max| *dt <= max),
    )
    .map(SampleValue::Date)
}
