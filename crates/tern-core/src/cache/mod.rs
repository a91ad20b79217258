//! # Tern Cache Store
//!
//! Key/value persistence for serialized objects. The kernel stores the
//! registry snapshot here under a fixed key so later process starts can skip
//! rebuilding it.
//!
//! - [`CachePool`]: the store interface (`has_item`, `get_item`, `save`, ...).
//! - [`CacheEntry`]: a key plus a JSON payload and its creation time.
//! - [`FileCachePool`]: one JSON file per key under a directory.
//! - [`MemoryCachePool`]: process-local store, mostly for tests and `memory` backend.
pub mod error;
pub mod file;
pub mod memory;
pub mod pool;

pub use error::CacheError;
pub use file::FileCachePool;
pub use memory::MemoryCachePool;
pub use pool::{CacheEntry, CachePool, SharedCachePool};

#[cfg(test)]
mod tests;
