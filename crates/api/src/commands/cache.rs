//! Cache inspection and maintenance commands
//!
//! Every command normalizes the token before it reaches the store. Reads
//! never fail: a storage fault is logged and the command answers with its
//! empty value. Only [`cache_set`] reports errors to the caller.

use daytrace_domain::{is_past_date, normalize_token, CacheEntryInfo, CacheStats};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_with_default, execute_with_string_error};
use crate::utils::logging::log_command_execution;

/// Whether an entry exists. Storage failures read as `false`.
pub async fn cache_has(ctx: &AppContext, date: &str, api_token: &str) -> bool {
    let token = normalize_token(api_token);
    execute_with_default("cache::cache_has", false, || ctx.cache.try_has(date, &token)).await
}

/// Cached payload, or `None` when absent or unreadable.
pub async fn cache_get(ctx: &AppContext, date: &str, api_token: &str) -> Option<String> {
    let token = normalize_token(api_token);
    execute_with_default("cache::cache_get", None, || ctx.cache.try_get(date, &token)).await
}

/// Store a serialized activity array for `(date, token)`.
pub async fn cache_set(
    ctx: &AppContext,
    date: &str,
    api_token: &str,
    data: &str,
) -> Result<(), String> {
    let token = normalize_token(api_token);
    execute_with_string_error("cache::cache_set", || ctx.cache.try_set(date, &token, data)).await
}

/// Remove one entry. Failures are logged, not returned.
pub async fn cache_delete(ctx: &AppContext, date: &str, api_token: &str) {
    let token = normalize_token(api_token);
    execute_with_default("cache::cache_delete", 0, || ctx.cache.try_delete(date, &token)).await;
}

/// Remove every entry for the token. Returns the number removed.
pub async fn cache_clear_all(ctx: &AppContext, api_token: &str) -> usize {
    let token = normalize_token(api_token);
    execute_with_default("cache::cache_clear_all", 0, || ctx.cache.try_clear_all(&token)).await
}

/// Evict entries older than `max_age_days`, or the configured retention
/// when `None`.
pub async fn cache_clear_old(ctx: &AppContext, max_age_days: Option<u32>) -> usize {
    let days = max_age_days.unwrap_or(ctx.config.cache.max_age_days);
    execute_with_default("cache::cache_clear_old", 0, || ctx.cache.try_clear_old(days)).await
}

/// Entry count and date range for the token.
pub async fn cache_get_stats(ctx: &AppContext, api_token: &str) -> CacheStats {
    let token = normalize_token(api_token);
    execute_with_default("cache::cache_get_stats", CacheStats::default(), || {
        ctx.cache.try_stats(&token)
    })
    .await
}

/// Cached dates for the token, newest first.
pub async fn cache_get_all_dates(ctx: &AppContext, api_token: &str) -> Vec<String> {
    let token = normalize_token(api_token);
    execute_with_default("cache::cache_get_all_dates", Vec::new(), || {
        ctx.cache.try_list_dates(&token)
    })
    .await
}

/// Most recent entries across all tokens, metadata only.
pub async fn cache_list_all(ctx: &AppContext) -> Vec<CacheEntryInfo> {
    execute_with_default("cache::cache_list_all", Vec::new(), || ctx.cache.try_list_all()).await
}

/// Whether `date` is strictly before today. Malformed dates are not past.
pub fn cache_is_past_date(date: &str) -> bool {
    let start = std::time::Instant::now();
    let past = is_past_date(date);
    log_command_execution("cache::cache_is_past_date", start.elapsed(), true);
    past
}
