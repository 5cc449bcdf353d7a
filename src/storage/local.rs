//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//! └── posts.json      # { "posts": [...] }, newest first
//! public/
//! └── feed.xml        # written by the feed pipeline
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::PostsCache;
use crate::storage::PostStorage;

/// Post cache stored as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    cache_file: PathBuf,
}

impl LocalStorage {
    /// Create a storage backed by `cache_file`.
    pub fn new(cache_file: impl Into<PathBuf>) -> Self {
        Self {
            cache_file: cache_file.into(),
        }
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Read the cache file, returning None if it doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.cache_file).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Write bytes atomically (write to temp, then rename), creating parent directories.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let tmp = path.with_extension("tmp");
    let written: Result<()> = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
    .await;

    if written.is_err() {
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove {}: {}", tmp.display(), e);
            }
        }
    }
    written
}

#[async_trait]
impl PostStorage for LocalStorage {
    async fn load_cache(&self) -> Result<PostsCache> {
        let Some(bytes) = self.read_bytes().await? else {
            log::info!(
                "No cache at {}, starting fresh",
                self.cache_file.display()
            );
            return Ok(PostsCache::default());
        };

        match serde_json::from_slice(&bytes) {
            Ok(cache) => Ok(cache),
            Err(e) => {
                log::warn!(
                    "Could not parse existing cache {}: {}. Starting fresh",
                    self.cache_file.display(),
                    e
                );
                Ok(PostsCache::default())
            }
        }
    }

    async fn load_existing(&self) -> Result<PostsCache> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Err(AppError::missing_input(format!(
                "{} not found. Run scrape first",
                self.cache_file.display()
            ))),
        }
    }

    async fn save_cache(&self, cache: &PostsCache) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cache)?;
        write_atomic(&self.cache_file, &bytes).await?;
        log::info!(
            "Saved {} posts to {}",
            cache.len(),
            self.cache_file.display()
        );
        Ok(())
    }
}
