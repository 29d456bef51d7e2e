//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, when `DAYTRACE_DB_PATH` is set
//! 2. The first config file found by [`probe_config_paths`]
//! 3. [`Config::default`]
//!
//! ## Environment Variables
//! - `DAYTRACE_DB_PATH`: Database file path (required for env loading)
//! - `DAYTRACE_DB_POOL_SIZE`: Connection pool size
//! - `DAYTRACE_API_BASE_URL`: Remote API base URL
//! - `DAYTRACE_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `DAYTRACE_CACHE_MAX_AGE_DAYS`: Retention used by startup eviction
//! - `DAYTRACE_CACHE_EVICT_ON_STARTUP`: Whether to evict at startup
//!   (true/false)
//! - `DAYTRACE_LOG_LEVEL`: Default tracing filter
//!
//! Optional variables that are unset keep their default value.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use daytrace_domain::{Config, DaytraceError, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "daytrace.json", "daytrace.toml"];

/// Load configuration with automatic fallback strategy
///
/// Environment first, then a probed file, then defaults. An explicitly
/// malformed source is an error rather than a silent fallback.
///
/// # Errors
/// Returns `DaytraceError::Config` if an environment value or a found config
/// file is invalid.
pub fn load() -> Result<Config> {
    if std::env::var_os("DAYTRACE_DB_PATH").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No configuration source found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `DaytraceError::Config` if `DAYTRACE_DB_PATH` is missing or any
/// numeric or boolean variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("DAYTRACE_DB_PATH")?;
    if let Some(pool_size) = env_parse::<u32>("DAYTRACE_DB_POOL_SIZE", "pool size")? {
        config.database.pool_size = pool_size;
    }

    if let Ok(base_url) = std::env::var("DAYTRACE_API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Some(timeout) = env_parse::<u64>("DAYTRACE_API_TIMEOUT_SECS", "API timeout")? {
        config.api.timeout_secs = timeout;
    }

    if let Some(days) = env_parse::<u32>("DAYTRACE_CACHE_MAX_AGE_DAYS", "cache max age")? {
        config.cache.max_age_days = days;
    }
    config.cache.evict_on_startup =
        env_bool("DAYTRACE_CACHE_EVICT_ON_STARTUP", config.cache.evict_on_startup)?;

    if let Ok(level) = std::env::var("DAYTRACE_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. JSON and TOML are
/// supported, detected by file extension.
///
/// # Errors
/// Returns `DaytraceError::Config` if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DaytraceError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DaytraceError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DaytraceError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DaytraceError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DaytraceError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DaytraceError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory and up to two parents, then the
/// executable's directory and up to two parents. Within each directory the
/// order is `config.json`, `config.toml`, `daytrace.json`, `daytrace.toml`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    candidates_in(&roots).into_iter().find(|path| path.is_file())
}

fn candidates_in(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .collect()
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| DaytraceError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable. Unset yields `None`.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DaytraceError::Config(format!("Invalid {what}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Unset yields `default`; anything else is a config error.
fn env_bool(key: &str, default: bool) -> Result<bool> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DaytraceError::Config(format!("Invalid boolean for {key}: {raw:?}"))),
    }
}
