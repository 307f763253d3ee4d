//! Download cache for large flat files.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Files under `dir` younger than `max_age` are reused instead of downloaded.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    max_age: Duration,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_age,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Path of a cached file still within its lifetime.
    pub async fn fresh(&self, name: &str) -> Option<PathBuf> {
        let path = self.path(name);
        let modified = tokio::fs::metadata(&path).await.ok()?.modified().ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        (age < self.max_age).then_some(path)
    }

    /// Store downloaded bytes, replacing any older copy.
    pub async fn store(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path(name);
        let tmp = path.with_extension("part");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_after_store() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));

        assert!(cache.fresh("ce.series").await.is_none());
        cache.store("ce.series", b"series_id\n").await.unwrap();
        assert_eq!(cache.fresh("ce.series").await, Some(dir.path().join("ce.series")));
    }

    #[tokio::test]
    async fn test_zero_lifetime_is_never_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), Duration::ZERO);
        cache.store("ce.series", b"x").await.unwrap();
        assert!(cache.fresh("ce.series").await.is_none());
    }
}
