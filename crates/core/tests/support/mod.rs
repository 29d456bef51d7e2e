//! Shared test helpers for `daytrace-core` integration tests.
//!
//! In-memory implementations of the cache and fetcher ports, with counters
//! and failure switches so tests can observe exactly what the service did.

pub mod mocks;

pub use mocks::{GatedFetcher, InMemoryCache};
