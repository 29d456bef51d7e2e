//! Activity retrieval: cache-first lookup, request coalescing and
//! aggregation of fetched records.

pub mod aggregator;
pub mod ports;
pub mod service;

pub use aggregator::{format_duration, total_seconds, ActivitySummary};
pub use ports::{ActivityCache, ActivityFetcher};
pub use service::{ActivityFetch, ActivityService};
