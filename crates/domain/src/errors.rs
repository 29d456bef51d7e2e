//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Daytrace
///
/// `Clone` so one outcome can be handed to every caller waiting on the same
/// in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DaytraceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API request failed with status {status}: {}", remote_message(.body))]
    Remote { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to write cache: {0}")]
    CacheWrite(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DaytraceError {
    /// Stable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Remote { .. } => "remote",
            Self::Network(_) => "network",
            Self::CacheWrite(_) => "cache_write",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }

    /// HTTP status for remote failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Human-readable message for a failed API response body.
///
/// TimeCamp error bodies are usually `{"message": "..."}`; that message is
/// preferred over the raw body.
pub fn remote_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| trimmed.to_string())
}

/// Result type alias for Daytrace operations
pub type Result<T> = std::result::Result<T, DaytraceError>;
