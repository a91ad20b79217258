use std::collections::HashMap;
use std::sync::RwLock;

use crate::cache::error::CacheError;
use crate::cache::pool::{validate_key, CacheEntry, CachePool};
use crate::kernel::error::Result;

/// In-process cache store. Entries live as long as the pool.
#[derive(Debug, Default)]
pub struct MemoryCachePool {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCachePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> CacheError {
        CacheError::Unavailable {
            backend: "memory".to_string(),
            message: "entry table lock poisoned".to_string(),
        }
    }
}

impl CachePool for MemoryCachePool {
    fn name(&self) -> &str {
        "memory"
    }

    fn has_item(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.contains_key(key))
    }

    fn get_item(&self, key: &str) -> Result<Option<CacheEntry>> {
        validate_key(key)?;
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, entry: CacheEntry) -> Result<()> {
        validate_key(entry.key())?;
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(entry.key().to_string(), entry);
        Ok(())
    }

    fn delete_item(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        Ok(entries.remove(key).is_some())
    }

    fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        let count = entries.len();
        entries.clear();
        Ok(count)
    }
}
