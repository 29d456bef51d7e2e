//! SQLite-backed activity cache.
//!
//! Implements the `ActivityCache` port. All database operations run in
//! `spawn_blocking` to avoid blocking the async runtime. The inherent
//! `try_*` methods report every failure; the port implementation logs read
//! failures and answers with the empty value instead.

use std::sync::Arc;

use async_trait::async_trait;
use daytrace_common::storage::{SqliteConnection, StorageError};
use daytrace_core::ActivityCache;
use daytrace_domain::constants::LIST_ALL_LIMIT;
use daytrace_domain::{
    normalize_token, CacheEntryInfo, CacheStats, DaytraceError, Result as DomainResult,
};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::{debug, warn};

use super::manager::{map_storage_error, DbManager};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// SQLite-backed activity cache.
///
/// Tokens are normalized again on every call, so raw tokens passed by a
/// careless caller still address the same entries.
pub struct SqliteActivityCache {
    db: Arc<DbManager>,
}

impl SqliteActivityCache {
    /// Create a new repository with the given database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Whether an entry exists for `(date, token)`.
    pub async fn try_has(&self, date: &str, api_token: &str) -> DomainResult<bool> {
        let (date, token) = (date.to_string(), normalize_token(api_token));
        self.with_connection(move |conn| query_exists(conn, &date, &token)).await
    }

    /// Raw cached payload for `(date, token)`, if any.
    pub async fn try_get(&self, date: &str, api_token: &str) -> DomainResult<Option<String>> {
        let (date, token) = (date.to_string(), normalize_token(api_token));
        self.with_connection(move |conn| query_payload(conn, &date, &token)).await
    }

    /// Insert or replace the entry for `(date, token)`, stamped now.
    pub async fn try_set(&self, date: &str, api_token: &str, payload: &str) -> DomainResult<()> {
        let (date, token) = (date.to_string(), normalize_token(api_token));
        let payload = payload.to_string();
        let cached_at = chrono::Utc::now().timestamp_millis();

        self.with_connection(move |conn| upsert_entry(conn, &date, &token, &payload, cached_at))
            .await
    }

    /// Delete one entry; returns the number of rows removed.
    pub async fn try_delete(&self, date: &str, api_token: &str) -> DomainResult<usize> {
        let (date, token) = (date.to_string(), normalize_token(api_token));
        self.with_connection(move |conn| {
            conn.execute(
                "DELETE FROM activity_cache WHERE date = ?1 AND api_token = ?2",
                params![date, token],
            )
            .map_err(StorageError::from)
        })
        .await
    }

    /// Delete every entry for the token; returns the number removed.
    pub async fn try_clear_all(&self, api_token: &str) -> DomainResult<usize> {
        let token = normalize_token(api_token);
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM activity_cache WHERE api_token = ?1", params![token])
                .map_err(StorageError::from)
        })
        .await
    }

    /// Delete entries written at or before `now - max_age_days`.
    ///
    /// Age is measured from `cached_at`, not from the activity date. With
    /// `max_age_days == 0` every existing entry is removed.
    pub async fn try_clear_old(&self, max_age_days: u32) -> DomainResult<usize> {
        let cutoff =
            chrono::Utc::now().timestamp_millis() - i64::from(max_age_days) * MILLIS_PER_DAY;
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM activity_cache WHERE cached_at <= ?1", params![cutoff])
                .map_err(StorageError::from)
        })
        .await
    }

    /// Cached dates for the token, newest first.
    pub async fn try_list_dates(&self, api_token: &str) -> DomainResult<Vec<String>> {
        let token = normalize_token(api_token);
        self.with_connection(move |conn| query_dates(conn, &token)).await
    }

    /// Entry count and date range for the token.
    pub async fn try_stats(&self, api_token: &str) -> DomainResult<CacheStats> {
        let token = normalize_token(api_token);
        self.with_connection(move |conn| query_stats(conn, &token)).await
    }

    /// Most recently written entries across all tokens, metadata only.
    pub async fn try_list_all(&self) -> DomainResult<Vec<CacheEntryInfo>> {
        self.with_connection(query_recent_entries).await
    }

    async fn with_connection<T, F>(&self, op: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteConnection) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<T> {
            let conn = db.get_connection()?;
            op(&conn).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl ActivityCache for SqliteActivityCache {
    async fn has(&self, date: &str, api_token: &str) -> bool {
        or_default("has", self.try_has(date, api_token).await)
    }

    async fn get(&self, date: &str, api_token: &str) -> Option<String> {
        or_default("get", self.try_get(date, api_token).await)
    }

    async fn set(&self, date: &str, api_token: &str, payload: &str) -> DomainResult<()> {
        self.try_set(date, api_token, payload).await.map_err(|err| {
            warn!(date, error = %err, "failed to write activity cache entry");
            err
        })
    }

    async fn delete(&self, date: &str, api_token: &str) {
        let removed = or_default("delete", self.try_delete(date, api_token).await);
        debug!(date, removed, "cache entry deleted");
    }

    async fn clear_all(&self, api_token: &str) -> usize {
        or_default("clear_all", self.try_clear_all(api_token).await)
    }

    async fn clear_old(&self, max_age_days: u32) -> usize {
        let removed = or_default("clear_old", self.try_clear_old(max_age_days).await);
        debug!(max_age_days, removed, "expired cache entries removed");
        removed
    }

    async fn list_dates(&self, api_token: &str) -> Vec<String> {
        or_default("list_dates", self.try_list_dates(api_token).await)
    }

    async fn stats(&self, api_token: &str) -> CacheStats {
        or_default("stats", self.try_stats(api_token).await)
    }

    async fn list_all(&self) -> Vec<CacheEntryInfo> {
        or_default("list_all", self.try_list_all().await)
    }
}

/// Log a failed cache operation and fall back to the empty answer.
fn or_default<T: Default>(operation: &'static str, result: DomainResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(operation, error = %err, "activity cache operation failed, using default");
        T::default()
    })
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn query_exists(conn: &SqliteConnection, date: &str, token: &str) -> Result<bool, StorageError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM activity_cache WHERE date = ?1 AND api_token = ?2",
            params![date, token],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn query_payload(
    conn: &SqliteConnection,
    date: &str,
    token: &str,
) -> Result<Option<String>, StorageError> {
    conn.query_row(
        "SELECT data FROM activity_cache WHERE date = ?1 AND api_token = ?2",
        params![date, token],
        |row| row.get(0),
    )
    .optional()
    .map_err(StorageError::from)
}

fn upsert_entry(
    conn: &SqliteConnection,
    date: &str,
    token: &str,
    payload: &str,
    cached_at: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO activity_cache (date, api_token, data, cached_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(date, api_token) DO UPDATE SET
            data = excluded.data,
            cached_at = excluded.cached_at",
        params![date, token, payload, cached_at],
    )?;
    Ok(())
}

fn query_dates(conn: &SqliteConnection, token: &str) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT date FROM activity_cache
         WHERE api_token = ?1
         ORDER BY date DESC",
    )?;
    let dates = stmt.query_map(params![token], |row| row.get(0))?.collect::<Result<_, _>>()?;
    Ok(dates)
}

fn query_stats(conn: &SqliteConnection, token: &str) -> Result<CacheStats, StorageError> {
    conn.query_row(
        "SELECT COUNT(*), MIN(date), MAX(date) FROM activity_cache WHERE api_token = ?1",
        params![token],
        |row| {
            Ok(CacheStats {
                total_entries: row.get(0)?,
                oldest_date: row.get(1)?,
                newest_date: row.get(2)?,
            })
        },
    )
    .map_err(StorageError::from)
}

fn query_recent_entries(conn: &SqliteConnection) -> Result<Vec<CacheEntryInfo>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT date, api_token, LENGTH(data), cached_at
         FROM activity_cache
         ORDER BY cached_at DESC
         LIMIT ?1",
    )?;
    let limit = i64::try_from(LIST_ALL_LIMIT).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok(CacheEntryInfo {
                date: row.get(0)?,
                api_token: row.get(1)?,
                data_length: row.get(2)?,
                cached_at: row.get(3)?,
            })
        })?
        .collect::<Result<_, _>>()?;
    Ok(rows)
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Map JoinError from spawn_blocking to DaytraceError.
fn map_join_error(err: task::JoinError) -> DaytraceError {
    if err.is_cancelled() {
        DaytraceError::Internal("blocking task cancelled".into())
    } else {
        DaytraceError::Internal(format!("blocking task failed: {err}"))
    }
}

// ============================================================================
// Tests
// ============================================================================
