//! Storage abstractions for the post cache.
//!
//! The cache is the single source of truth between runs. It is read once
//! at the start of a scrape and written at most once at the end.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::PostsCache;

// Re-export for convenience
pub use local::{LocalStorage, write_atomic};

/// Trait for post cache backends.
#[async_trait]
pub trait PostStorage: Send + Sync {
    /// Load the cache for a scrape run.
    ///
    /// A missing or unparseable cache yields an empty one.
    async fn load_cache(&self) -> Result<PostsCache>;

    /// Load the cache for a consumer that requires it to exist.
    async fn load_existing(&self) -> Result<PostsCache>;

    /// Persist the cache, replacing the previous version atomically.
    async fn save_cache(&self, cache: &PostsCache) -> Result<()>;
}
