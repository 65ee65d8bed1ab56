//! Image attribute state
//!
//! The JSON shape persisted inside a model row for an image-valued
//! attribute. The ORM lifecycle itself (save/retrieve hooks, casting) is a
//! collaborator concern; this type owns the serialized state and the
//! request-path generation for rendered variants.

use crate::config::Config;
use crate::error::AppError;
use crate::modifiers::ModifierSet;
use crate::render_path::build_request_path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageState {
    /// Storage path of the original bytes (the canonical object key)
    pub path: String,
    pub extension: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Content hash of the stored bytes
    pub hash: String,
    /// Unix timestamp of the last store
    pub timestamp: i64,
    /// Free-form metadata, also usable in path templates
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ImageState {
    /// Deserialize from the JSON attribute value stored in a row.
    pub fn from_attribute_value(value: &str) -> Result<Self, AppError> {
        serde_json::from_str(value)
            .map_err(|e| AppError::Internal(format!("Malformed image attribute state: {}", e)))
    }

    /// Serialize to the JSON attribute value to persist.
    pub fn to_attribute_value(&self) -> Result<String, AppError> {
        serde_json::to_string(self)
            .map_err(|e| AppError::Internal(format!("Failed to serialize image state: {}", e)))
    }

    pub fn exists(&self) -> bool {
        !self.path.is_empty()
    }

    /// Build the render request path for this image with an optional
    /// `|`-separated modifier spec (e.g. `"size:100x100|grayscale"`).
    ///
    /// Requesting modifiers while the render route is disabled is a
    /// programming error surfaced to the caller; without modifiers the
    /// plain storage path is returned so it can be served directly.
    pub fn request_path(&self, modifiers: Option<&str>, config: &Config) -> Result<String, AppError> {
        if !config.render_enable {
            if modifiers.is_some() {
                return Err(AppError::Internal(
                    "Cannot process render modifiers unless the render route is enabled".into(),
                ));
            }
            return Ok(self.path.clone());
        }

        let set = match modifiers {
            Some(spec) => ModifierSet::from_spec(spec),
            None => ModifierSet::default(),
        };
        Ok(build_request_path(&self.path, &set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ImageState {
        ImageState {
            path: "gallery/sunset.jpg".to_string(),
            extension: "jpg".to_string(),
            width: Some(1920),
            height: Some(1080),
            hash: "abc123".to_string(),
            timestamp: 1_700_000_000,
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let original = state();
        let json = original.to_attribute_value().unwrap();
        let restored = ImageState::from_attribute_value(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let json = r#"{"path":"a/b.png","extension":"png","width":null,"height":null,"hash":"","timestamp":0}"#;
        let restored = ImageState::from_attribute_value(json).unwrap();
        assert!(restored.metadata.is_empty());
    }

    #[test]
    fn test_request_path_with_modifiers() {
        let config = Config::default();
        let path = state()
            .request_path(Some("size:100x100|grayscale"), &config)
            .unwrap();
        assert_eq!(path, "gallery/sunset.grayscale_size:100x100.jpg");
    }

    #[test]
    fn test_request_path_render_disabled() {
        let config = Config {
            render_enable: false,
            ..Config::default()
        };
        assert_eq!(
            state().request_path(None, &config).unwrap(),
            "gallery/sunset.jpg"
        );
        assert!(state()
            .request_path(Some("grayscale"), &config)
            .is_err());
    }
}
