//! # Tern Cache Errors
//!
//! [`CacheError`] covers key validation, payload encoding, and backends that
//! cannot be reached.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid cache key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Failed to serialize value for cache key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize value stored under cache key '{key}': {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache entry '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache backend '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },
}
