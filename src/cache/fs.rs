//! Filesystem blob store
//!
//! Blobs live at `{dir}/{hex(key)}`. Writes go to a sibling temp file that is
//! renamed into place.

use crate::cache::{BlobStore, CacheKey, CacheResult};
use crate::CacheError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Blob store backed by a directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Opens (creating if needed) the cache directory
    pub fn new(dir: &Path) -> CacheResult<Self> {
        std::fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the blob for `key`
    pub fn blob_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.to_hex())
    }
}

impl BlobStore for FsBlobStore {
    fn load(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        let path = self.blob_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn save(&self, key: &CacheKey, bytes: &[u8]) -> CacheResult<()> {
        let path = self.blob_path(key);
        let tmp = self.dir.join(format!("{}.tmp", key.to_hex()));

        std::fs::write(&tmp, bytes).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        Ok(())
    }
}

/// Store used when caching is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl BlobStore for DisabledStore {
    fn load(&self, _key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn save(&self, _key: &CacheKey, _bytes: &[u8]) -> CacheResult<()> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.display().to_string(),
        source,
    }
}
