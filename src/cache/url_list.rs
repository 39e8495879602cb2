//! Whole-list cache of harvested detail URLs
//!
//! Separate from the blob cache: one plain-text file, newline-joined. When it
//! exists, a run skips harvesting and uses the stored list.

use crate::cache::CacheResult;
use crate::CacheError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Well-known file name of the URL list inside the cache directory
pub const URL_LIST_FILE: &str = "urllist.txt";

/// The stored URL list for one cache directory
#[derive(Debug, Clone)]
pub struct UrlListCache {
    path: PathBuf,
}

impl UrlListCache {
    /// URL list cache for `cache_dir`, or `None` when caching is disabled
    pub fn for_dir(cache_dir: &str) -> Option<Self> {
        if cache_dir.is_empty() {
            return None;
        }
        Some(Self {
            path: Path::new(cache_dir).join(URL_LIST_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored list, skipping blank lines
    ///
    /// # Returns
    ///
    /// * `Ok(Some(urls))` - A list was stored
    /// * `Ok(None)` - No list file exists
    /// * `Err(CacheError)` - The file exists but could not be read
    pub fn load(&self) -> CacheResult<Option<Vec<String>>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let urls = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Some(urls))
    }

    /// Stores the list; an empty list is never written
    pub fn save(&self, urls: &[String]) -> CacheResult<()> {
        if urls.is_empty() {
            tracing::debug!("Not caching an empty URL list");
            return Ok(());
        }

        let io_error = |source| CacheError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&self.path, urls.join("\n")).map_err(io_error)
    }
}
