//! Durable byte cache for fetched pages and images
//!
//! This module handles everything that persists between runs:
//! - Content-addressable blobs keyed by the SHA-1 of the resource URL
//! - The read-through-or-fetch contract used by page and image fetches
//! - The coarse cache of the harvested URL list

mod byte_cache;
mod fs;
mod key;
mod traits;
mod url_list;

pub use byte_cache::{ByteCache, CacheStats};
pub use fs::{DisabledStore, FsBlobStore};
pub use key::CacheKey;
pub use traits::{BlobStore, CacheResult};
pub use url_list::{UrlListCache, URL_LIST_FILE};

use std::path::Path;

/// Opens the blob cache for a configured directory
///
/// An empty `cache_dir` disables caching: every fetch goes to the network.
///
/// # Arguments
///
/// * `cache_dir` - The configured cache directory (may be empty)
///
/// # Returns
///
/// * `Ok(ByteCache)` - Cache backed by the directory, or a pass-through cache
/// * `Err(CacheError)` - The directory could not be created
pub fn open_cache(cache_dir: &str) -> CacheResult<ByteCache> {
    if cache_dir.is_empty() {
        tracing::info!("Cache directory not set, caching disabled");
        return Ok(ByteCache::new(Box::new(DisabledStore)));
    }

    let store = FsBlobStore::new(Path::new(cache_dir))?;
    tracing::debug!("Using blob cache at {}", cache_dir);
    Ok(ByteCache::new(Box::new(store)))
}
