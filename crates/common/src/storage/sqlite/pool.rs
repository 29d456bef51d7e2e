//! SQLite connection pool
//!
//! r2d2 pooling over `r2d2_sqlite`, with pragmas applied on every new
//! connection.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::config::StorageConfig;
use crate::storage::error::{StorageError, StorageResult};

/// SQLite connection pool
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: StorageConfig,
}

impl SqlitePool {
    /// Open (creating if needed) the database at `path` and build the pool.
    ///
    /// The parent directory is created when missing. A test connection is
    /// acquired before returning so an unusable path fails here rather than
    /// on first query.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, the directory cannot
    /// be created, or the database cannot be opened.
    #[instrument(skip_all, fields(db_path = ?path, pool_size = config.pool_size))]
    pub fn new(path: &Path, config: StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pragma_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pragma_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {}", e))
            })?;

        drop(pool.get().map_err(|e| {
            StorageError::Connection(format!("Failed to get test connection: {}", e))
        })?);

        info!("SQLite pool created with {} connections", config.pool_size);

        Ok(Self { pool, config })
    }

    /// Acquire a connection from the pool.
    ///
    /// # Errors
    /// Returns [`StorageError::Timeout`] when no connection frees up within
    /// the configured timeout, [`StorageError::Connection`] otherwise.
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = std::time::Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                debug!("Connection acquired in {}ms", start.elapsed().as_millis());
                Ok(SqliteConnection::new(conn))
            }
            Err(e) => {
                let err_str = e.to_string().to_lowercase();
                if err_str.contains("timed out") || err_str.contains("timeout") {
                    warn!("Connection timeout after {:?}", self.config.connection_timeout);
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {}", e)))
                }
            }
        }
    }

    /// Maximum number of pooled connections.
    pub fn max_size(&self) -> u32 {
        self.pool.max_size()
    }

    /// Connections currently open and idle.
    pub fn idle_connections(&self) -> u32 {
        self.pool.state().idle_connections
    }
}
