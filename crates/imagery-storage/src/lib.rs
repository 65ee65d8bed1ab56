//! Imagery Storage Library
//!
//! Blob-store abstraction for the render pipeline. The [`Storage`] trait is
//! the injected capability every resolver call site receives; backends
//! included here are the local filesystem and an in-memory store (useful
//! for tests and as a lightweight fallback store).
//!
//! Keys are relative, slash-separated object paths. Keys must not contain
//! `..` or a leading `/`; backends validate this before touching anything.

pub mod local;
pub mod memory;
pub mod mime;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use mime::mime_type_for_path;
pub use traits::{Storage, StorageError, StorageResult};
