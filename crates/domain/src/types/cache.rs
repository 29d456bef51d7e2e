//! Cache bookkeeping types exposed to callers.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Summary of the cache entries held for one credential.
///
/// Serialized in camelCase because it crosses the host bridge as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: i64,
    pub oldest_date: Option<String>,
    pub newest_date: Option<String>,
}

/// One row of the cache inspection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryInfo {
    pub date: String,
    pub api_token: String,
    /// Length of the stored payload in characters.
    pub data_length: i64,
    /// Write time, Unix milliseconds.
    pub cached_at: i64,
}

/// Where a set of activities came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    Cache,
    Network,
}

impl_domain_status_conversions!(FetchSource {
    Cache => "cache",
    Network => "network",
});
