pub mod render_cache;
pub mod resolver;
