//! Domain types and models

pub mod activity;
pub mod cache;

pub use activity::{parse_activities, Activity};
pub use cache::{CacheEntryInfo, CacheStats, FetchSource};
