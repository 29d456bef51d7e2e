//! # Daytrace Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite activity cache and its connection manager
//! - The HTTP client and the TimeCamp activity API adapter
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `daytrace-core`
//! - Contains all "impure" code (database and network I/O)

pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::ActivityApiClient;
pub use database::{DbManager, SqliteActivityCache};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
