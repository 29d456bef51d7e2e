//! Application configuration structures
//!
//! Every section is `#[serde(default)]` so a config file only needs the keys
//! it overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DB_FILE_NAME, DEFAULT_API_BASE_URL, DEFAULT_MAX_CACHE_AGE_DAYS, DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Local cache database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path().display().to_string(), pool_size: 4 }
    }
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Cache retention settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_age_days: u32,
    /// Run age-based eviction once when the application context starts.
    pub evict_on_startup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_age_days: DEFAULT_MAX_CACHE_AGE_DAYS, evict_on_startup: true }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `daytrace_core=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Default location of the cache database.
///
/// Uses the platform data directory (`~/.local/share` on Linux) and falls
/// back to the working directory when none is available.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("daytrace"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DB_FILE_NAME)
}
