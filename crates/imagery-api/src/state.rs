//! Shared application state

use crate::services::render_cache::RenderCache;
use imagery_core::Config;
use imagery_storage::Storage;
use std::sync::Arc;

/// State shared across all request handlers.
pub struct AppState {
    pub config: Config,
    /// Primary blob store
    pub storage: Arc<dyn Storage>,
    /// Optional fallback store consulted when the primary misses
    pub fallback_storage: Option<Arc<dyn Storage>>,
    /// In-process render response cache, absent when caching is disabled
    pub render_cache: Option<RenderCache>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        fallback_storage: Option<Arc<dyn Storage>>,
    ) -> Self {
        let render_cache = if config.caching_enable {
            Some(RenderCache::new(
                config.cache_capacity,
                std::time::Duration::from_secs(config.cache_ttl_secs),
            ))
        } else {
            None
        };
        Self {
            config,
            storage,
            fallback_storage,
            render_cache,
        }
    }
}
