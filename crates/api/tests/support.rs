#![allow(dead_code)]

use daytrace_common::testing::TempDir;
use daytrace_domain::{ApiConfig, CacheConfig, Config, DatabaseConfig};
use daytrace_lib::AppContext;

/// Application context backed by a throwaway database.
pub struct TestContext {
    pub ctx: AppContext,
    /// Keep temporary directory alive for the lifetime of the context.
    pub temp_dir: TempDir,
}

/// Configuration pointing at `temp_dir` and `api_base_url`, without startup
/// eviction.
pub fn test_config(temp_dir: &TempDir, api_base_url: &str) -> Config {
    Config {
        database: DatabaseConfig { path: temp_dir.db_path().display().to_string(), pool_size: 2 },
        api: ApiConfig { base_url: api_base_url.to_string(), timeout_secs: 5 },
        cache: CacheConfig { max_age_days: 90, evict_on_startup: false },
        ..Config::default()
    }
}

/// Create a context whose API calls go to `api_base_url`.
pub async fn setup_test_context(api_base_url: &str) -> TestContext {
    let temp_dir = TempDir::new("app-test").expect("failed to create temporary directory");
    let config = test_config(&temp_dir, api_base_url);
    let ctx = AppContext::new_with_config(config).await.expect("failed to build app context");

    TestContext { ctx, temp_dir }
}

/// Context for tests that never reach the network.
pub async fn setup_offline_context() -> TestContext {
    setup_test_context("http://127.0.0.1:9").await
}

/// Push an entry's write time `days` into the past.
pub fn backdate(ctx: &AppContext, date: &str, days: i64) {
    let conn = ctx.db.get_connection().expect("connection available");
    let stamp = chrono::Utc::now().timestamp_millis() - days * 86_400_000;
    conn.execute(
        "UPDATE activity_cache SET cached_at = ?1 WHERE date = ?2",
        rusqlite::params![stamp, date],
    )
    .expect("backdate update succeeds");
}
