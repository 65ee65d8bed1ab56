//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use imagery_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!("Configuration loaded and validated successfully");

    let (storage, fallback_storage) = storage::setup_storage(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), storage, fallback_storage));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
