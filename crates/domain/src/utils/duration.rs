//! Duration extraction for heterogeneous activity records.

use chrono::{DateTime, NaiveDateTime};

use crate::constants::DURATION_FIELDS;
use crate::types::Activity;

/// Duration of one activity in whole seconds.
///
/// The first of [`DURATION_FIELDS`] holding a finite number that is still
/// positive once rounded to the nearest second wins; sub-half-second values
/// are skipped like zero. Failing that, the span
/// between `start_time` and `end_time` is used when both parse and end is
/// after start. Anything else counts as zero.
pub fn extract_duration(activity: &Activity) -> u64 {
    let explicit = DURATION_FIELDS
        .iter()
        .filter_map(|field| activity.numeric_field(field))
        .filter(|secs| secs.is_finite())
        .map(f64::round)
        .find(|secs| *secs >= 1.0);

    if let Some(secs) = explicit {
        // Saturating cast: absurd provider values clamp instead of wrapping.
        return secs as u64;
    }

    span_seconds(activity).unwrap_or(0)
}

fn span_seconds(activity: &Activity) -> Option<u64> {
    let start = parse_timestamp(activity.timestamp_field("start_time")?)?;
    let end = parse_timestamp(activity.timestamp_field("end_time")?)?;

    (end > start).then(|| (end - start).num_seconds().unsigned_abs())
}

/// Accepts RFC 3339 and naive `YYYY-MM-DD[T ]HH:MM:SS[.f]` (read as UTC).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
