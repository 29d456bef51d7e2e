//! Integration tests for `ActivityService`: cache-first lookup, write-through
//! and coalescing of concurrent identical requests.

mod support;

use std::sync::Arc;
use std::time::Duration;

use daytrace_core::{ActivityCache, ActivityService};
use daytrace_domain::{Activity, DaytraceError, FetchSource};
use serde_json::json;
use support::{GatedFetcher, InMemoryCache};

const DATE: &str = "2024-03-01";

fn sample_activities() -> Vec<Activity> {
    serde_json::from_value(json!([
        {"id": 1, "name": "Editor", "time_span": 600},
        {"id": 2, "name": "Browser", "duration": 90}
    ]))
    .unwrap()
}

fn service(cache: &Arc<InMemoryCache>, fetcher: &Arc<GatedFetcher>) -> Arc<ActivityService> {
    Arc::new(ActivityService::new(cache.clone(), fetcher.clone()))
}

// ============================================================================
// Cache-first lookup
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn second_call_is_served_from_cache() {
    let cache = InMemoryCache::new();
    let fetcher = GatedFetcher::returning(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let first = service.fetch_activities("tok", DATE, false).await.unwrap();
    let second = service.fetch_activities("tok", DATE, false).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(first.source, FetchSource::Network);
    assert_eq!(second.source, FetchSource::Cache);
    assert_eq!(first.activities, second.activities);
    assert!(first.cache_write_error.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn write_through_stores_normalized_token_and_sends_raw_token() {
    let cache = InMemoryCache::new();
    let fetcher = GatedFetcher::returning(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    service.fetch_activities("  tok  ", DATE, false).await.unwrap();
    let again = service.fetch_activities("tok", DATE, false).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(fetcher.tokens(), vec!["  tok  ".to_string()]);
    assert!(cache.payload(DATE, "tok").is_some());
    assert_eq!(again.source, FetchSource::Cache);
}

#[tokio::test(flavor = "multi_thread")]
async fn cached_single_object_is_wrapped_in_list() {
    let cache = InMemoryCache::new();
    cache.seed(DATE, "tok", r#"{"id": 7, "time_span": 30}"#);
    let fetcher = GatedFetcher::returning(Ok(Vec::new()));
    let service = service(&cache, &fetcher);

    let result = service.fetch_activities("tok", DATE, false).await.unwrap();

    assert_eq!(fetcher.calls(), 0);
    assert_eq!(result.activities.len(), 1);
    assert_eq!(result.activities[0].id, Some(json!(7)));
}

#[tokio::test(flavor = "multi_thread")]
async fn corrupt_cache_entry_falls_through_to_network() {
    let cache = InMemoryCache::new();
    cache.seed(DATE, "tok", "{not json");
    let fetcher = GatedFetcher::returning(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let result = service.fetch_activities("tok", DATE, false).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(result.source, FetchSource::Network);
    let repaired: serde_json::Value =
        serde_json::from_str(&cache.payload(DATE, "tok").unwrap()).unwrap();
    assert!(repaired.is_array());
}

#[tokio::test(flavor = "multi_thread")]
async fn force_refresh_bypasses_and_overwrites_cache() {
    let cache = InMemoryCache::new();
    cache.seed(DATE, "tok", r#"[{"id": "stale"}]"#);
    let fetcher = GatedFetcher::returning(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let result = service.fetch_activities("tok", DATE, true).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(result.source, FetchSource::Network);
    let stored: Vec<Activity> =
        serde_json::from_str(&cache.payload(DATE, "tok").unwrap()).unwrap();
    assert_eq!(stored, sample_activities());
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn invalid_input_touches_neither_cache_nor_network() {
    let cache = InMemoryCache::new();
    let fetcher = GatedFetcher::returning(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let err = service.fetch_activities("   ", DATE, false).await.unwrap_err();
    assert_eq!(err, DaytraceError::InvalidInput("API token is required".into()));

    let err = service.fetch_activities("tok", "", false).await.unwrap_err();
    assert_eq!(err, DaytraceError::InvalidInput("Date is required".into()));

    let err = service.fetch_activities("tok", "2024-1-1", true).await.unwrap_err();
    assert!(matches!(err, DaytraceError::InvalidInput(msg) if msg.contains("YYYY-MM-DD")));

    assert_eq!(fetcher.calls(), 0);
    assert_eq!(cache.reads(), 0);
    assert_eq!(cache.len(), 0);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn network_errors_propagate_and_are_not_cached() {
    let cache = InMemoryCache::new();
    let remote = DaytraceError::Remote { status: 401, body: r#"{"message":"bad token"}"#.into() };
    let fetcher = GatedFetcher::returning(Err(remote.clone()));
    let service = service(&cache, &fetcher);

    let err = service.fetch_activities("tok", DATE, false).await.unwrap_err();
    assert_eq!(err, remote);
    assert!(!cache.has(DATE, "tok").await);
    assert_eq!(service.in_flight_count(), 0);

    fetcher.set_response(Ok(sample_activities()));
    let ok = service.fetch_activities("tok", DATE, false).await.unwrap();
    assert_eq!(ok.activities.len(), 2);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn cache_write_failure_is_reported_without_losing_data() {
    let cache = InMemoryCache::new();
    cache.fail_writes(true);
    let fetcher = GatedFetcher::returning(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let result = service.fetch_activities("tok", DATE, false).await.unwrap();

    assert_eq!(result.activities, sample_activities());
    assert!(matches!(result.cache_write_error, Some(DaytraceError::CacheWrite(_))));

    // Nothing was stored, so the next call goes back to the network.
    cache.fail_writes(false);
    let next = service.fetch_activities("tok", DATE, false).await.unwrap();
    assert_eq!(next.source, FetchSource::Network);
    assert!(next.cache_write_error.is_none());
    assert_eq!(fetcher.calls(), 2);
}

// ============================================================================
// Coalescing
// ============================================================================

async fn spawn_callers(
    service: &Arc<ActivityService>,
    token: &'static str,
    count: usize,
) -> Vec<tokio::task::JoinHandle<daytrace_domain::Result<daytrace_core::ActivityFetch>>> {
    let handles = (0..count)
        .map(|_| {
            let service = Arc::clone(service);
            tokio::spawn(async move { service.fetch_activities(token, DATE, false).await })
        })
        .collect();
    // Let every caller get past the cache check and join the pending request.
    tokio::time::sleep(Duration::from_millis(100)).await;
    handles
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_calls_share_one_request() {
    let cache = InMemoryCache::new();
    let fetcher = GatedFetcher::gated(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let handles = spawn_callers(&service, "tok", 5).await;
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(service.in_flight_count(), 1);

    fetcher.release();
    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(service.in_flight_count(), 0);
    for result in &results {
        assert_eq!(result, &results[0]);
        assert_eq!(result.source, FetchSource::Network);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_the_same_error() {
    let cache = InMemoryCache::new();
    let fetcher = GatedFetcher::gated(Err(DaytraceError::Network("connection reset".into())));
    let service = service(&cache, &fetcher);

    let handles = spawn_callers(&service, "tok", 3).await;
    fetcher.release();

    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err, DaytraceError::Network("connection reset".into()));
    }
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(service.in_flight_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn whitespace_variants_of_a_token_coalesce() {
    let cache = InMemoryCache::new();
    let fetcher = GatedFetcher::gated(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let mut handles = spawn_callers(&service, "tok", 1).await;
    handles.extend(spawn_callers(&service, " tok ", 1).await);
    assert_eq!(service.in_flight_count(), 1);

    fetcher.release();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn retrieval_completes_when_the_caller_is_dropped() {
    let cache = InMemoryCache::new();
    let fetcher = GatedFetcher::gated(Ok(sample_activities()));
    let service = service(&cache, &fetcher);

    let handles = spawn_callers(&service, "tok", 1).await;
    for handle in &handles {
        handle.abort();
    }
    fetcher.release();

    for _ in 0..50 {
        if service.in_flight_count() == 0 && cache.payload(DATE, "tok").is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(service.in_flight_count(), 0);
    assert!(cache.payload(DATE, "tok").is_some(), "write-through should still happen");
}

// ============================================================================
// Port defaults
// ============================================================================

#[test]
fn clear_expired_uses_default_retention() {
    let cache = InMemoryCache::new();
    cache.seed(DATE, "tok", "[]");

    // The in-memory clock treats nothing as older than the 90-day default.
    assert_eq!(tokio_test::block_on(cache.clear_expired()), 0);
    assert_eq!(cache.len(), 1);
    assert_eq!(tokio_test::block_on(cache.clear_old(0)), 1);
    assert_eq!(cache.len(), 0);
}
