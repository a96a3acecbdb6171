//! Write-through cache for fetched bugs.
//!
//! The client hands every bug it fetches to the configured [`CacheSink`]
//! as serialized JSON. Storing is best effort: failures are logged and never
//! reach the caller of the fetch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Something that keeps named blobs, such as a directory or a key-value store.
pub trait CacheSink: Send + Sync {
    /// Store `body` under `key`, replacing what was there.
    fn store(&self, key: &str, body: &[u8]) -> io::Result<()>;
}

/// Keeps one `<key>.json` file per entry in a directory.
#[derive(Debug, Clone)]
pub struct DirCache {
    dir: PathBuf,
}

impl DirCache {
    /// Cache into `dir`. The directory is created on first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `key` is (or would be) stored.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CacheSink for DirCache {
    fn store(&self, key: &str, body: &[u8]) -> io::Result<()> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cache key: {:?}", key),
            ));
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), body)
    }
}
