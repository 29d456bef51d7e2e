//! Storage configuration
//!
//! Connection pool settings and the SQLite pragmas applied to every pooled
//! connection.

use std::time::Duration;

use super::error::{StorageError, StorageResult};

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Maximum number of connections in the pool (default: 4)
    pub pool_size: u32,

    /// How long to wait for a free connection (default: 5s)
    pub connection_timeout: Duration,

    /// Busy timeout for lock contention (default: 5000ms)
    pub busy_timeout: Duration,

    /// Enable WAL journal mode (default: true)
    pub enable_wal: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            connection_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_millis(5000),
            enable_wal: true,
        }
    }
}

impl StorageConfig {
    /// Create a configuration with the given pool size
    pub fn with_pool_size(pool_size: u32) -> Self {
        Self { pool_size, ..Default::default() }
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns an error if any configuration value is out of range.
    pub fn validate(&self) -> StorageResult<()> {
        if self.pool_size == 0 {
            return Err(StorageError::InvalidConfig(
                "pool_size must be greater than 0".to_string(),
            ));
        }
        if self.pool_size > 100 {
            return Err(StorageError::InvalidConfig("pool_size too large (max: 100)".to_string()));
        }
        if self.connection_timeout.is_zero() {
            return Err(StorageError::InvalidConfig(
                "connection_timeout must be greater than 0".to_string(),
            ));
        }
        if self.busy_timeout.is_zero() {
            return Err(StorageError::InvalidConfig(
                "busy_timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
