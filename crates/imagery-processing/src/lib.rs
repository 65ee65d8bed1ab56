//! Imagery Processing Library
//!
//! CPU-bound image work for the render pipeline: the modifier transform
//! pipeline, placeholder synthesis, and the fallback-store watermark. All
//! functions here are pure byte-in/byte-out; callers are expected to run
//! them on a blocking thread.

mod font;
pub mod placeholder;
pub mod transform;
pub mod watermark;

// Re-export commonly used types
pub use placeholder::Placeholder;
pub use transform::{render, FormatFamily, RenderedImage};
pub use watermark::mark_fallback;
