//! Source resolution
//!
//! Decides where the bytes for a render request come from, in a fixed
//! order: placeholder marker, primary store, fallback store, placeholder
//! substitution for missing files, and finally a 404.

use crate::state::AppState;
use imagery_core::{AppError, RenderPath};
use imagery_storage::StorageError;

const DEFAULT_PLACEHOLDER_SIZE: (u32, u32) = (400, 400);

/// Where the source bytes for a request come from. Placeholders are
/// synthesized later, on a blocking thread with the rest of the CPU work.
pub enum ResolvedSource {
    Stored {
        bytes: Vec<u8>,
        mime_type: String,
        from_fallback: bool,
    },
    Placeholder {
        width: u32,
        height: u32,
        bgcolor: Option<String>,
    },
}

pub async fn resolve_source(
    state: &AppState,
    path: &RenderPath,
) -> Result<ResolvedSource, AppError> {
    let config = &state.config;

    if config.placeholder_enable && path.is_placeholder(&config.placeholder_filename) {
        return Ok(placeholder_for(path));
    }

    let key = path.canonical_path.as_str();
    match state.storage.get(key).await {
        Ok(bytes) => {
            let mime_type = state
                .storage
                .mime_type(key)
                .await
                .map_err(|e| storage_error(key, e))?;
            return Ok(ResolvedSource::Stored {
                bytes,
                mime_type,
                from_fallback: false,
            });
        }
        Err(StorageError::NotFound(_)) => {}
        Err(StorageError::InvalidKey(detail)) => return Err(AppError::InvalidPath(detail)),
        Err(e) => return Err(storage_error(key, e)),
    }

    if let Some(fallback) = &state.fallback_storage {
        match fallback.get(key).await {
            Ok(bytes) => {
                let mime_type = fallback
                    .mime_type(key)
                    .await
                    .map_err(|e| storage_error(key, e))?;
                tracing::debug!(key = %key, "Serving from fallback store");
                return Ok(ResolvedSource::Stored {
                    bytes,
                    mime_type,
                    from_fallback: true,
                });
            }
            Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(storage_error(key, e)),
        }
    }

    if config.placeholder_enable && config.placeholder_for_missing_files {
        tracing::debug!(key = %key, "Substituting placeholder for missing file");
        return Ok(placeholder_for(path));
    }

    Err(AppError::NotFound(key.to_string()))
}

/// Placeholder geometry comes from the request's size modifier when
/// present, the default square otherwise.
fn placeholder_for(path: &RenderPath) -> ResolvedSource {
    let (width, height) = path.modifiers.size.unwrap_or(DEFAULT_PLACEHOLDER_SIZE);
    ResolvedSource::Placeholder {
        width,
        height,
        bgcolor: path.modifiers.bgcolor.clone(),
    }
}

fn storage_error(key: &str, err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(_) => AppError::NotFound(key.to_string()),
        other => AppError::Storage(other.to_string()),
    }
}
