//! Port interfaces for activity retrieval
//!
//! These traits define the boundaries between the retrieval service and the
//! storage/network implementations.

use async_trait::async_trait;
use daytrace_domain::constants::DEFAULT_MAX_CACHE_AGE_DAYS;
use daytrace_domain::{Activity, CacheEntryInfo, CacheStats, Result};

/// Persistent per-(date, token) store of serialized activity arrays.
///
/// Tokens passed in are expected to be normalized already. Reads never fail:
/// a storage fault is logged by the implementation and reported as the
/// empty answer. Only [`ActivityCache::set`] surfaces errors.
#[async_trait]
pub trait ActivityCache: Send + Sync {
    /// Whether an entry exists for the pair.
    async fn has(&self, date: &str, api_token: &str) -> bool;

    /// Stored payload for the pair, verbatim.
    async fn get(&self, date: &str, api_token: &str) -> Option<String>;

    /// Insert or replace the entry, stamping the current time.
    async fn set(&self, date: &str, api_token: &str, payload: &str) -> Result<()>;

    /// Remove one entry. Missing entries are not an error.
    async fn delete(&self, date: &str, api_token: &str);

    /// Remove every entry for the token; returns how many were removed.
    async fn clear_all(&self, api_token: &str) -> usize;

    /// Remove entries written more than `max_age_days` ago, for all tokens.
    async fn clear_old(&self, max_age_days: u32) -> usize;

    /// [`ActivityCache::clear_old`] with the default retention.
    async fn clear_expired(&self) -> usize {
        self.clear_old(DEFAULT_MAX_CACHE_AGE_DAYS).await
    }

    /// Distinct cached dates for the token, newest first.
    async fn list_dates(&self, api_token: &str) -> Vec<String>;

    /// Count and date range of the token's entries.
    async fn stats(&self, api_token: &str) -> CacheStats;

    /// Most recently written entries across all tokens, capped.
    async fn list_all(&self) -> Vec<CacheEntryInfo>;
}

/// Remote source of activities for one day.
#[async_trait]
pub trait ActivityFetcher: Send + Sync {
    /// Fetch the day's activities. `api_token` is sent exactly as given.
    async fn fetch_day(&self, date: &str, api_token: &str) -> Result<Vec<Activity>>;
}
