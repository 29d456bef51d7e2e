//! Testing utilities and helpers
//!
//! - **[`temp`]**: Temporary directory helpers for database-backed tests

pub mod temp;

pub use temp::TempDir;
