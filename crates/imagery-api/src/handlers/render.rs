//! On-demand render handler
//!
//! `GET {render_path}/{*path}`. The wildcard carries a storage path with
//! an optional modifier blob; the handler parses it, resolves source
//! bytes, runs the transform pipeline on a blocking thread and serves the
//! encoded result with long-lived browser cache headers.

use crate::error::HttpAppError;
use crate::services::resolver::{self, ResolvedSource};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use imagery_core::{AppError, RenderPath};
use imagery_processing::{mark_fallback, transform, Placeholder, RenderedImage};
use std::sync::Arc;

pub async fn render_image(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, HttpAppError> {
    let render_path = RenderPath::parse(&path)?;
    let cache_key = render_path.cache_key();

    if let Some(cache) = &state.render_cache {
        if let Some(hit) = cache.get(&cache_key) {
            tracing::debug!(key = %cache_key, "Render cache hit");
            return Ok(image_response(
                hit.bytes,
                &hit.mime_type,
                state.config.browser_cache_max_age,
            ));
        }
    }

    let resolved = resolver::resolve_source(&state, &render_path).await?;

    let config = &state.config;
    let modifiers = render_path.modifiers;
    let force = config.force_unmodified_image_rendering;

    let rendered: RenderedImage = match resolved {
        ResolvedSource::Stored {
            bytes,
            mime_type,
            from_fallback,
        } => {
            let mark = from_fallback && config.fallback_mark_images;
            if modifiers.is_empty() && !force && !mark {
                // Unmodified requests skip the decode/encode round trip
                RenderedImage { bytes, mime_type }
            } else {
                tokio::task::spawn_blocking(move || -> Result<RenderedImage, AppError> {
                    let mut out = if !modifiers.is_empty() || force {
                        transform::render(&bytes, &modifiers)?
                    } else {
                        RenderedImage { bytes, mime_type }
                    };
                    if mark {
                        out = mark_fallback(&out.bytes)?;
                    }
                    Ok(out)
                })
                .await
                .map_err(|e| AppError::Internal(format!("Render task failed: {}", e)))??
            }
        }
        ResolvedSource::Placeholder {
            width,
            height,
            bgcolor,
        } => {
            tokio::task::spawn_blocking(move || -> Result<RenderedImage, AppError> {
                let placeholder = Placeholder::create(width, height, bgcolor.as_deref())?;
                if modifiers.is_empty() {
                    Ok(placeholder)
                } else {
                    transform::render(&placeholder.bytes, &modifiers)
                }
            })
            .await
            .map_err(|e| AppError::Internal(format!("Render task failed: {}", e)))??
        }
    };

    let bytes = Bytes::from(rendered.bytes);
    if let Some(cache) = &state.render_cache {
        cache.put(cache_key, bytes.clone(), rendered.mime_type.clone());
    }

    Ok(image_response(
        bytes,
        &rendered.mime_type,
        config.browser_cache_max_age,
    ))
}

fn image_response(bytes: Bytes, mime_type: &str, max_age: u64) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime_type.to_string()),
            (header::CACHE_CONTROL, format!("public, max-age={}", max_age)),
        ],
        bytes,
    )
        .into_response()
}
