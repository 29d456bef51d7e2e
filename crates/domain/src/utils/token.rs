//! API token normalization.
//!
//! Cache identity uses the trimmed token; the network layer always receives
//! the token exactly as the caller supplied it.

use crate::errors::{DaytraceError, Result};

/// Canonical cache-key form of a token: surrounding whitespace removed.
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_string()
}

/// Reject tokens that are empty once trimmed.
pub fn validate_api_token(raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(DaytraceError::InvalidInput("API token is required".to_string()));
    }
    Ok(())
}
