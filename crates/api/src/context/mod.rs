//! Application context - dependency injection container

use std::sync::Arc;

use daytrace_core::{ActivityCache, ActivityService};
use daytrace_domain::{Config, Result};
use daytrace_infra::{ActivityApiClient, DbManager, SqliteActivityCache};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    /// Resolved configuration the context was built from.
    pub config: Config,
    /// Pooled database handle shared by the store.
    pub db: Arc<DbManager>,
    /// Concrete store, so commands can observe storage failures before
    /// falling back to their defaults.
    pub cache: Arc<SqliteActivityCache>,
    /// Cache-first retrieval with request coalescing.
    pub activity_service: Arc<ActivityService>,
}

impl AppContext {
    /// Create a new application context from the discovered configuration
    ///
    /// See [`daytrace_infra::config::load`] for the lookup order.
    pub async fn new() -> Result<Self> {
        let config = daytrace_infra::config::load()?;
        Self::new_with_config(config).await
    }

    /// Create a new application context with custom configuration
    ///
    /// Opens the cache database (running migrations), builds the API client
    /// and the retrieval service, then applies startup eviction when
    /// `cache.evict_on_startup` is set.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::open(&config.database)?);
        let cache = Arc::new(SqliteActivityCache::new(Arc::clone(&db)));
        let api_client = Arc::new(ActivityApiClient::new(&config.api)?);

        let activity_service =
            Arc::new(ActivityService::new(cache.clone() as Arc<dyn ActivityCache>, api_client));

        if config.cache.evict_on_startup {
            let removed = cache.clear_old(config.cache.max_age_days).await;
            info!(removed, max_age_days = config.cache.max_age_days, "startup cache eviction");
        }

        info!(
            db_path = %db.path().display(),
            api_base_url = %config.api.base_url,
            "application context initialised"
        );

        Ok(Self { config, db, cache, activity_service })
    }
}
