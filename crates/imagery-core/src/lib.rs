//! Imagery Core Library
//!
//! Shared types for the imagery rendering service: configuration, the error
//! taxonomy, the modifier-set model, and request-path parsing/generation.

pub mod config;
pub mod error;
pub mod models;
pub mod modifiers;
pub mod path_template;
pub mod render_path;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
pub use models::ImageState;
pub use modifiers::{Crop, FitMode, ModifierSet};
pub use render_path::RenderPath;
