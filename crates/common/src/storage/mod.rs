//! Storage primitives for local SQLite databases
//!
//! Provides an r2d2 connection pool, the per-connection pragma setup and the
//! storage error type shared by repositories.

pub mod config;
pub mod error;
pub mod sqlite;

// Re-export commonly used types
pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use sqlite::{apply_connection_pragmas, SqliteConnection, SqlitePool};
