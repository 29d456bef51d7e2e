//! Activity retrieval service - cache-first lookup with request coalescing

use std::collections::HashMap;
use std::sync::Arc;

use daytrace_domain::{
    normalize_token, parse_activities, validate_api_token, validate_date, Activity,
    DaytraceError, FetchSource, Result,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use super::ports::{ActivityCache, ActivityFetcher};

type SharedFetch = Shared<BoxFuture<'static, Result<ActivityFetch>>>;

/// Outcome of a successful retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityFetch {
    /// Records for the requested day, in provider order.
    pub activities: Vec<Activity>,
    /// Whether the records came from the cache or the network.
    pub source: FetchSource,
    /// Set when the network fetch succeeded but persisting it failed. The
    /// activities are still valid; the next call will go to the network
    /// again.
    pub cache_write_error: Option<DaytraceError>,
}

impl ActivityFetch {
    fn cached(activities: Vec<Activity>) -> Self {
        Self { activities, source: FetchSource::Cache, cache_write_error: None }
    }
}

/// Activity retrieval service
///
/// Serves `(token, date)` lookups from the cache when possible. Concurrent
/// misses for the same `(token, date, force_refresh)` share one network
/// request: the first caller starts it as a background task and later
/// callers await the same result.
pub struct ActivityService {
    cache: Arc<dyn ActivityCache>,
    fetcher: Arc<dyn ActivityFetcher>,
    in_flight: Arc<Mutex<HashMap<String, SharedFetch>>>,
}

impl ActivityService {
    /// Create a new activity service
    pub fn new(cache: Arc<dyn ActivityCache>, fetcher: Arc<dyn ActivityFetcher>) -> Self {
        Self { cache, fetcher, in_flight: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Activities for `date`, from the cache unless `force_refresh` is set.
    ///
    /// Validation errors are returned before any cache or network access.
    /// Network errors are returned unchanged; cache read problems are
    /// treated as misses.
    #[instrument(skip(self, api_token))]
    pub async fn fetch_activities(
        &self,
        api_token: &str,
        date: &str,
        force_refresh: bool,
    ) -> Result<ActivityFetch> {
        validate_api_token(api_token)?;
        validate_date(date)?;

        let normalized = normalize_token(api_token);

        if !force_refresh {
            if let Some(activities) = self.read_cached(date, &normalized).await {
                info!(count = activities.len(), "activities served from cache");
                return Ok(ActivityFetch::cached(activities));
            }
        }

        let key = request_key(&normalized, date, force_refresh);
        self.join_or_start(key, api_token, date, normalized).await
    }

    /// Number of network retrievals currently running.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    async fn read_cached(&self, date: &str, api_token: &str) -> Option<Vec<Activity>> {
        if !self.cache.has(date, api_token).await {
            return None;
        }

        let payload = self.cache.get(date, api_token).await?;
        let parsed = serde_json::from_str::<serde_json::Value>(&payload)
            .map_err(|err| DaytraceError::Internal(err.to_string()))
            .and_then(parse_activities);

        match parsed {
            Ok(activities) => Some(activities),
            Err(err) => {
                warn!(error = %err, "cached payload unreadable, refetching");
                None
            }
        }
    }

    /// Return the pending retrieval for `key`, starting one if none exists.
    ///
    /// Lookup and insert happen under a single lock acquisition. The spawned
    /// task takes the same lock to remove its key, so it cannot finish
    /// before the entry is in the map.
    fn join_or_start(
        &self,
        key: String,
        raw_token: &str,
        date: &str,
        normalized: String,
    ) -> SharedFetch {
        let mut in_flight = self.in_flight.lock();
        if let Some(pending) = in_flight.get(&key) {
            debug!("joining in-flight activity request");
            return pending.clone();
        }

        let cache = Arc::clone(&self.cache);
        let fetcher = Arc::clone(&self.fetcher);
        let registry = Arc::clone(&self.in_flight);
        let raw_token = raw_token.to_string();
        let date = date.to_string();
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            let outcome = retrieve(fetcher, cache, &date, &raw_token, &normalized).await;
            registry.lock().remove(&task_key);
            outcome
        });

        let shared = async move {
            handle.await.unwrap_or_else(|err| {
                Err(DaytraceError::Internal(format!("activity fetch task failed: {err}")))
            })
        }
        .boxed()
        .shared();

        in_flight.insert(key, shared.clone());
        shared
    }
}

async fn retrieve(
    fetcher: Arc<dyn ActivityFetcher>,
    cache: Arc<dyn ActivityCache>,
    date: &str,
    raw_token: &str,
    normalized: &str,
) -> Result<ActivityFetch> {
    let activities = fetcher.fetch_day(date, raw_token).await.inspect_err(|err| {
        warn!(date, error = %err, "activity fetch failed");
    })?;

    let cache_write_error = match write_through(cache.as_ref(), date, normalized, &activities).await
    {
        Ok(()) => None,
        Err(err) => {
            warn!(date, error = %err, "fetched activities could not be cached");
            Some(err)
        }
    };

    info!(date, count = activities.len(), "activities fetched from network");

    Ok(ActivityFetch { activities, source: FetchSource::Network, cache_write_error })
}

async fn write_through(
    cache: &dyn ActivityCache,
    date: &str,
    api_token: &str,
    activities: &[Activity],
) -> Result<()> {
    let payload = serde_json::to_string(activities)
        .map_err(|err| DaytraceError::CacheWrite(err.to_string()))?;

    cache.set(date, api_token, &payload).await.map_err(|err| match err {
        DaytraceError::CacheWrite(_) => err,
        other => DaytraceError::CacheWrite(other.to_string()),
    })
}

fn request_key(normalized_token: &str, date: &str, force_refresh: bool) -> String {
    format!("{normalized_token}-{date}-{force_refresh}")
}
