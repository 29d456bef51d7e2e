//! Application constants
//!
//! Centralized location for domain-level constants.

/// Default base URL of the TimeCamp third-party API.
pub const DEFAULT_API_BASE_URL: &str = "https://app.timecamp.com/third_party/api";

/// Default request timeout for API calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cache entries older than this are evicted by `clear_old` when no age is
/// given.
pub const DEFAULT_MAX_CACHE_AGE_DAYS: u32 = 90;

/// Maximum number of rows returned by the cache inspection listing.
pub const LIST_ALL_LIMIT: usize = 20;

/// Activity fields carrying a duration in seconds, in priority order.
pub const DURATION_FIELDS: [&str; 5] =
    ["time_span", "duration", "time", "duration_seconds", "time_spent"];

/// Calendar date format used for the `date` query parameter and cache keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// File name of the cache database inside the data directory.
pub const DB_FILE_NAME: &str = "activity-cache.db";
