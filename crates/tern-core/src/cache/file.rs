use std::path::{Path, PathBuf};

use crate::cache::error::CacheError;
use crate::cache::pool::{validate_key, CacheEntry, CachePool};
use crate::kernel::error::Result;
use crate::storage::{LocalStorageProvider, StorageProvider};

const ENTRY_EXTENSION: &str = "json";

/// Cache store keeping one JSON document per key under a directory
#[derive(Debug, Clone)]
pub struct FileCachePool {
    storage: LocalStorageProvider,
}

impl FileCachePool {
    /// Open (creating if needed) a pool rooted at `directory`.
    ///
    /// Fails when the directory cannot be created, which the kernel reports
    /// as an unreachable cache store.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let storage = LocalStorageProvider::new(directory.into());
        storage.create_dir_all(Path::new(""))?;
        log::debug!("Opened file cache pool at {}", storage.base_path().display());
        Ok(Self { storage })
    }

    pub fn directory(&self) -> &Path {
        self.storage.base_path()
    }

    fn entry_path(key: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}", key, ENTRY_EXTENSION))
    }
}

impl CachePool for FileCachePool {
    fn name(&self) -> &str {
        "file"
    }

    fn has_item(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.storage.is_file(&Self::entry_path(key)))
    }

    fn get_item(&self, key: &str) -> Result<Option<CacheEntry>> {
        validate_key(key)?;
        let path = Self::entry_path(key);
        if !self.storage.is_file(&path) {
            return Ok(None);
        }
        let bytes = self.storage.read_to_bytes(&path)?;
        let entry = serde_json::from_slice::<CacheEntry>(&bytes).map_err(|source| CacheError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(entry))
    }

    fn save(&self, entry: CacheEntry) -> Result<()> {
        validate_key(entry.key())?;
        let bytes = serde_json::to_vec_pretty(&entry).map_err(|source| CacheError::Serialization {
            key: entry.key().to_string(),
            source,
        })?;
        self.storage.write_bytes(&Self::entry_path(entry.key()), &bytes)
    }

    fn delete_item(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let path = Self::entry_path(key);
        if !self.storage.is_file(&path) {
            return Ok(false);
        }
        self.storage.remove_file(&path)?;
        Ok(true)
    }

    fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.storage.read_dir(Path::new(""))? {
            let is_entry = path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION);
            if is_entry && self.storage.is_file(&path) {
                self.storage.remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
