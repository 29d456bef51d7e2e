//! Mock port implementations for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use daytrace_core::{ActivityCache, ActivityFetcher};
use daytrace_domain::constants::LIST_ALL_LIMIT;
use daytrace_domain::{Activity, CacheEntryInfo, CacheStats, DaytraceError, Result};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

/// In-memory `ActivityCache` keyed by `(date, token)`.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<(String, String), (String, i64)>>,
    clock: AtomicUsize,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
}

impl InMemoryCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an entry directly, bypassing `set`.
    pub fn seed(&self, date: &str, token: &str, payload: &str) {
        let stamp = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
        self.entries.lock().insert((date.to_string(), token.to_string()), (payload.to_string(), stamp));
    }

    /// Stored payload, without counting as a read.
    pub fn payload(&self, date: &str, token: &str) -> Option<String> {
        self.entries.lock().get(&(date.to_string(), token.to_string())).map(|(p, _)| p.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivityCache for InMemoryCache {
    async fn has(&self, date: &str, api_token: &str) -> bool {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().contains_key(&(date.to_string(), api_token.to_string()))
    }

    async fn get(&self, date: &str, api_token: &str) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.payload(date, api_token)
    }

    async fn set(&self, date: &str, api_token: &str, payload: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DaytraceError::Database("disk I/O error".to_string()));
        }
        self.seed(date, api_token, payload);
        Ok(())
    }

    async fn delete(&self, date: &str, api_token: &str) {
        self.entries.lock().remove(&(date.to_string(), api_token.to_string()));
    }

    async fn clear_all(&self, api_token: &str) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(_, token), _| token != api_token);
        before - entries.len()
    }

    async fn clear_old(&self, max_age_days: u32) -> usize {
        // Logical clock: everything is "old" only when max_age_days is zero.
        if max_age_days > 0 {
            return 0;
        }
        let mut entries = self.entries.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    async fn list_dates(&self, api_token: &str) -> Vec<String> {
        let mut dates: Vec<String> = self
            .entries
            .lock()
            .keys()
            .filter(|(_, token)| token == api_token)
            .map(|(date, _)| date.clone())
            .collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        dates
    }

    async fn stats(&self, api_token: &str) -> CacheStats {
        let dates = self.list_dates(api_token).await;
        CacheStats {
            total_entries: dates.len() as i64,
            oldest_date: dates.last().cloned(),
            newest_date: dates.first().cloned(),
        }
    }

    async fn list_all(&self) -> Vec<CacheEntryInfo> {
        let mut rows: Vec<CacheEntryInfo> = self
            .entries
            .lock()
            .iter()
            .map(|((date, token), (payload, stamp))| CacheEntryInfo {
                date: date.clone(),
                api_token: token.clone(),
                data_length: payload.chars().count() as i64,
                cached_at: *stamp,
            })
            .collect();
        rows.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        rows.truncate(LIST_ALL_LIMIT);
        rows
    }
}

/// `ActivityFetcher` that returns a scripted response, optionally holding
/// every call until the test releases it.
pub struct GatedFetcher {
    response: Mutex<Result<Vec<Activity>>>,
    gate: Option<Semaphore>,
    calls: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl GatedFetcher {
    /// Fetcher that answers immediately.
    pub fn returning(response: Result<Vec<Activity>>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            gate: None,
            calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        })
    }

    /// Fetcher whose calls block until [`GatedFetcher::release`].
    pub fn gated(response: Result<Vec<Activity>>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            gate: Some(Semaphore::new(0)),
            calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1024);
        }
    }

    pub fn set_response(&self, response: Result<Vec<Activity>>) {
        *self.response.lock() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tokens exactly as they reached the fetcher.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }
}

#[async_trait]
impl ActivityFetcher for GatedFetcher {
    async fn fetch_day(&self, _date: &str, api_token: &str) -> Result<Vec<Activity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().push(api_token.to_string());

        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| DaytraceError::Internal(e.to_string()))?;
        }

        self.response.lock().clone()
    }
}
