use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::error::CacheError;
use crate::kernel::error::Result;

/// Shared handle to a cache store, as bound inside the registry
pub type SharedCachePool = Arc<dyn CachePool>;

/// A serialized object stored under a key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    key: String,
    value: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry from an already-encoded JSON payload
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
            created_at: Utc::now(),
        }
    }

    /// Encode `value` as the payload of a new entry
    pub fn from_serializable<T: Serialize>(key: impl Into<String>, value: &T) -> Result<Self> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|source| CacheError::Serialization { key: key.clone(), source })?;
        Ok(Self::new(key, value))
    }

    /// Decode the payload back into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.clone()).map_err(|source| {
            CacheError::Deserialization {
                key: self.key.clone(),
                source,
            }
            .into()
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Key/value store for cache entries.
///
/// Implementations must be safe to share between the kernel and any
/// component that resolves the pool from the registry.
pub trait CachePool: Send + Sync + Debug {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Check whether an entry exists for `key`
    fn has_item(&self, key: &str) -> Result<bool>;

    /// Fetch the entry stored for `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Persist `entry`, replacing any entry with the same key
    fn save(&self, entry: CacheEntry) -> Result<()>;

    /// Remove the entry for `key`. Returns whether something was removed.
    fn delete_item(&self, key: &str) -> Result<bool>;

    /// Remove every entry. Returns how many were removed.
    fn clear(&self) -> Result<usize>;
}

/// Keys double as file names for the file-backed pool, so they are limited
/// to ASCII alphanumerics, `-`, `_` and `.`.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty".to_string(),
        }
        .into());
    }
    if key.starts_with('.') {
        return Err(CacheError::InvalidKey {
            key: key.to_string(),
            reason: "key must not start with '.'".to_string(),
        }
        .into());
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(CacheError::InvalidKey {
            key: key.to_string(),
            reason: format!("unsupported character '{}'", c),
        }
        .into());
    }
    Ok(())
}
