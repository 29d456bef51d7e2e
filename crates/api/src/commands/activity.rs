//! Activity retrieval command

use daytrace_core::ActivitySummary;
use daytrace_domain::{Activity, FetchSource};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_with_string_error;

/// Activities for one day plus the figures shown alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    /// Records for the day, as returned by the provider.
    pub activities: Vec<Activity>,
    /// Per-activity totals computed from `activities`.
    pub summary: ActivitySummary,
    /// Where the records came from.
    pub source: FetchSource,
    /// Set when the records were fetched but could not be cached.
    pub cache_warning: Option<String>,
}

/// Fetch a day's activities through the caching service.
///
/// # Errors
///
/// Returns a human-readable message for validation, network, and remote
/// failures. A failed cache write is not an error: it is reported in
/// [`ActivityResponse::cache_warning`].
pub async fn fetch_activities(
    ctx: &AppContext,
    api_token: &str,
    date: &str,
    force_refresh: bool,
) -> Result<ActivityResponse, String> {
    let fetch = execute_with_string_error("activity::fetch_activities", || {
        ctx.activity_service.fetch_activities(api_token, date, force_refresh)
    })
    .await?;

    let cache_warning = fetch.cache_write_error.map(|err| {
        warn!(date, error = %err, "activities fetched but not cached");
        err.to_string()
    });

    Ok(ActivityResponse {
        summary: ActivitySummary::from_activities(&fetch.activities),
        activities: fetch.activities,
        source: fetch.source,
        cache_warning,
    })
}
