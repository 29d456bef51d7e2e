//! # Daytrace Domain
//!
//! Business domain types and pure helpers for Daytrace.
//!
//! This crate contains:
//! - The raw [`Activity`] record returned by the TimeCamp API
//! - Cache bookkeeping types ([`CacheStats`], [`CacheEntryInfo`])
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Token, date and duration helpers shared by every layer
//!
//! ## Architecture
//! - No dependencies on other Daytrace crates
//! - No I/O: everything here is deterministic apart from reading the local
//!   clock in [`utils::date::is_past_date`]

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::date::{is_past_date, validate_date};
pub use utils::duration::extract_duration;
pub use utils::token::{normalize_token, validate_api_token};
