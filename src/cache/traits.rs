//! Blob store trait
//!
//! A blob store persists immutable byte blobs under a [`CacheKey`]. There is
//! no expiry and no delete: once written, a blob is canonical.

use crate::cache::CacheKey;
use crate::CacheError;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for blob store backends
pub trait BlobStore: Send + Sync {
    /// Loads the blob stored under `key`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - The blob exists
    /// * `Ok(None)` - Nothing is stored under this key
    /// * `Err(CacheError)` - The blob exists but could not be read
    fn load(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>>;

    /// Stores `bytes` under `key`, replacing nothing that a reader could
    /// observe half-written
    fn save(&self, key: &CacheKey, bytes: &[u8]) -> CacheResult<()>;

    /// Whether this store persists anything at all
    fn is_persistent(&self) -> bool {
        true
    }
}
