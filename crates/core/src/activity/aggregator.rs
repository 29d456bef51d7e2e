//! Aggregate figures over a day's activities.

use daytrace_domain::{extract_duration, Activity};
use serde::{Deserialize, Serialize};

/// Sum of [`extract_duration`] over all activities.
pub fn total_seconds(activities: &[Activity]) -> u64 {
    activities.iter().map(extract_duration).fold(0, u64::saturating_add)
}

/// Human-readable `Xh Ym Zs`.
///
/// Zero components are left out, except that seconds are always shown when
/// nothing else is, so `0` renders as `"0s"`.
///
/// ```
/// use daytrace_core::activity::format_duration;
///
/// assert_eq!(format_duration(3661), "1h 1m 1s");
/// assert_eq!(format_duration(120), "2m");
/// assert_eq!(format_duration(0), "0s");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts: Vec<String> = [(hours, "h"), (minutes, "m")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, suffix)| format!("{value}{suffix}"))
        .collect();

    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }

    parts.join(" ")
}

/// Summary line for a day: total time and activity count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_seconds: u64,
    pub total_time: String,
    pub total_activities: usize,
}

impl ActivitySummary {
    /// Sum extracted durations over `activities`.
    pub fn from_activities(activities: &[Activity]) -> Self {
        let total_seconds = total_seconds(activities);
        Self {
            total_seconds,
            total_time: format_duration(total_seconds),
            total_activities: activities.len(),
        }
    }
}
