//! Read-through byte cache
//!
//! [`ByteCache::fetch_cached`] returns the stored blob for a key, or runs the
//! supplied fetch and stores its result. Failed fetches are never stored.

use crate::cache::{BlobStore, CacheKey};
use crate::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Hit/miss counters for a cache instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Content-addressable cache in front of a [`BlobStore`]
pub struct ByteCache {
    store: Box<dyn BlobStore>,
    key_locks: Mutex<HashMap<CacheKey, Arc<tokio::sync::Mutex<()>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ByteCache {
    pub fn new(store: Box<dyn BlobStore>) -> Self {
        Self {
            store,
            key_locks: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Whether blobs survive the current process
    pub fn is_enabled(&self) -> bool {
        self.store.is_persistent()
    }

    /// Returns the blob for `key`, fetching and storing it on a miss
    ///
    /// The check-fetch-store sequence holds a per-key lock, so concurrent
    /// callers asking for the same key run `fetch` at most once between them.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key of the resource
    /// * `fetch` - Fallback producing the bytes on a miss
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - Stored or freshly fetched bytes
    /// * `Err(HarvestError)` - The fallback failed; nothing was stored
    pub async fn fetch_cached<F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        let lock = self.key_lock(key);
        let result = {
            let _guard = lock.lock().await;
            self.load_or_fetch(key, fetch).await
        };
        self.release_key_lock(key, lock);
        result
    }

    async fn load_or_fetch<F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        match self.store.load(key) {
            Ok(Some(bytes)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Cache hit for {}", key);
                return Ok(bytes);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Unreadable cache blob {}, refetching: {}", key, e);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let bytes = fetch().await?;

        if let Err(e) = self.store.save(key, &bytes) {
            tracing::warn!("Failed to store cache blob {}: {}", key, e);
        }

        Ok(bytes)
    }

    /// Current hit/miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn key_lock(&self, key: &CacheKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .key_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(*key).or_default().clone()
    }

    /// Drops the lock entry for `key` unless another caller still holds it
    fn release_key_lock(&self, key: &CacheKey, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .key_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference in the map, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn pending_locks(&self) -> usize {
        self.key_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl std::fmt::Debug for ByteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteCache")
            .field("enabled", &self.is_enabled())
            .field("stats", &self.stats())
            .finish()
    }
}
