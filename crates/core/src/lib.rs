//! # Daytrace Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the activity cache and the remote fetcher
//! - The activity retrieval service (cache-first, coalesced)
//! - Aggregation helpers for display
//!
//! ## Architecture Principles
//! - Only depends on `daytrace-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod activity;

pub use activity::ports::{ActivityCache, ActivityFetcher};
pub use activity::{
    format_duration, total_seconds, ActivityFetch, ActivityService, ActivitySummary,
};
