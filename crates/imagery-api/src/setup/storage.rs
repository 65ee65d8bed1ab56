//! Storage backend setup

use anyhow::{Context, Result};
use imagery_core::Config;
use imagery_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Build the primary store and, when enabled, the fallback store.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn Storage>, Option<Arc<dyn Storage>>)> {
    let primary = LocalStorage::new(&config.storage_path)
        .await
        .with_context(|| format!("Failed to open storage at {}", config.storage_path))?;
    tracing::info!(path = %config.storage_path, "Primary storage ready");

    let mut fallback: Option<Arc<dyn Storage>> = None;
    if config.fallback_enable {
        if let Some(path) = &config.fallback_path {
            let store = LocalStorage::new(path)
                .await
                .with_context(|| format!("Failed to open fallback storage at {}", path))?;
            tracing::info!(path = %path, mark_images = config.fallback_mark_images, "Fallback storage ready");
            fallback = Some(Arc::new(store));
        }
    }

    Ok((Arc::new(primary), fallback))
}
