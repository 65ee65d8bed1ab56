//! Configuration module
//!
//! Environment-driven configuration for the render service. Values come
//! from the process environment (with `.env` support via dotenvy); every
//! knob has a default so a bare `imagery-api` starts with local storage
//! and sane caching behavior.

use std::env;

const DEFAULT_RENDER_PATH: &str = "/imagery";
const DEFAULT_PLACEHOLDER_FILENAME: &str = "_placeholder_";
const DEFAULT_CACHE_CAPACITY: usize = 1024;
const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_BROWSER_CACHE_MAX_AGE: u64 = 31_536_000;

/// Application configuration for the imagery render service.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,

    // Primary blob store (local filesystem root)
    pub storage_path: String,

    // Render route
    pub render_enable: bool,
    pub render_path: String,

    // Placeholder support (dev-mode synthesized images)
    pub placeholder_enable: bool,
    pub placeholder_filename: String,
    pub placeholder_for_missing_files: bool,

    // Response caching
    pub caching_enable: bool,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
    pub browser_cache_max_age: u64,

    // Fallback store (e.g. a production image mirror for dev environments)
    pub fallback_enable: bool,
    pub fallback_path: Option<String>,
    pub fallback_mark_images: bool,

    // When false, unmodified request paths are served byte-identical from
    // the store without a decode/encode round trip.
    pub force_unmodified_image_rendering: bool,
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env if present; ignore absence
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            server_port: env_parse("PORT", 3000),
            environment,
            storage_path: env::var("IMAGERY_STORAGE_PATH")
                .unwrap_or_else(|_| "./storage/imagery".to_string()),
            render_enable: env_bool("IMAGERY_RENDER_ENABLE", true),
            render_path: env::var("IMAGERY_RENDER_PATH")
                .unwrap_or_else(|_| DEFAULT_RENDER_PATH.to_string()),
            placeholder_enable: env_bool("IMAGERY_RENDER_PLACEHOLDER_ENABLE", false),
            placeholder_filename: env::var("IMAGERY_RENDER_PLACEHOLDER_FILENAME")
                .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_FILENAME.to_string()),
            placeholder_for_missing_files: env_bool(
                "IMAGERY_RENDER_PLACEHOLDER_USE_FOR_MISSING_FILES",
                false,
            ),
            caching_enable: env_bool("IMAGERY_RENDER_CACHING_ENABLE", true),
            cache_capacity: env_parse("IMAGERY_RENDER_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
            cache_ttl_secs: env_parse("IMAGERY_RENDER_CACHING_TTL", DEFAULT_CACHE_TTL_SECS),
            browser_cache_max_age: env_parse(
                "IMAGERY_BROWSER_CACHE_MAX_AGE",
                DEFAULT_BROWSER_CACHE_MAX_AGE,
            ),
            fallback_enable: env_bool("IMAGERY_RENDER_FALLBACK_ENABLE", false),
            fallback_path: env::var("IMAGERY_RENDER_FALLBACK_PATH").ok(),
            fallback_mark_images: env_bool("IMAGERY_RENDER_FALLBACK_MARK_IMAGES", false),
            force_unmodified_image_rendering: env_bool(
                "IMAGERY_FORCE_UNMODIFIED_IMAGE_RENDERING",
                false,
            ),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Fail fast on configurations that cannot work.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_path.trim().is_empty() {
            anyhow::bail!("IMAGERY_STORAGE_PATH must not be empty");
        }
        if !self.render_path.starts_with('/') {
            anyhow::bail!("IMAGERY_RENDER_PATH must start with '/'");
        }
        if self.fallback_enable && self.fallback_path.is_none() {
            anyhow::bail!(
                "IMAGERY_RENDER_FALLBACK_ENABLE is set but IMAGERY_RENDER_FALLBACK_PATH is missing"
            );
        }
        if self.caching_enable && self.cache_capacity == 0 {
            anyhow::bail!("IMAGERY_RENDER_CACHE_CAPACITY must be greater than zero");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: 3000,
            environment: "development".to_string(),
            storage_path: "./storage/imagery".to_string(),
            render_enable: true,
            render_path: DEFAULT_RENDER_PATH.to_string(),
            placeholder_enable: false,
            placeholder_filename: DEFAULT_PLACEHOLDER_FILENAME.to_string(),
            placeholder_for_missing_files: false,
            caching_enable: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            browser_cache_max_age: DEFAULT_BROWSER_CACHE_MAX_AGE,
            fallback_enable: false,
            fallback_path: None,
            fallback_mark_images: false,
            force_unmodified_image_rendering: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
        assert_eq!(config.render_path, "/imagery");
        assert_eq!(config.placeholder_filename, "_placeholder_");
        assert_eq!(config.cache_ttl_secs, 60);
    }

    #[test]
    fn test_fallback_requires_path() {
        let config = Config {
            fallback_enable: true,
            fallback_path: None,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_render_path_must_be_absolute() {
        let config = Config {
            render_path: "imagery".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
