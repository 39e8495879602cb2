use sha1::{Digest, Sha1};
use std::fmt;

/// SHA-1 digest of a resource identifier, used as a blob lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 20]);

impl CacheKey {
    /// Derives the key for a page or image URL
    pub fn for_identifier(identifier: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(identifier.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Lowercase hex form, used as the blob file name
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
