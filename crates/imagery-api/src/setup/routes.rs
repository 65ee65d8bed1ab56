//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{http::Method, routing::get, Router};
use imagery_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let mut router = Router::new().route("/health", get(handlers::health::health));

    if config.render_enable {
        let render_route = format!("{}/{{*path}}", config.render_path.trim_end_matches('/'));
        tracing::info!(route = %render_route, "Render endpoint enabled");
        router = router.route(&render_route, get(handlers::render::render_image));
    } else {
        tracing::info!("Render endpoint disabled");
    }

    // Rendered images are public assets
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD])
        .allow_origin(Any);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
