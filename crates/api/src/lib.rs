//! # Daytrace App
//!
//! Application layer - context wiring, host commands and the bridge.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Commands used by the UI bridge and the CLI
//! - The `cache:*` bridge dispatcher
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the SQLite cache and the HTTP client into the activity service

pub mod bridge;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use bridge::{dispatch, CacheChannel};
pub use commands::*;
pub use context::*;
