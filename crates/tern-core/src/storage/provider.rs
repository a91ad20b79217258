use std::fmt::Debug;
use std::path::{Path, PathBuf};
use crate::kernel::error::Result;

/// Trait for storage providers that can read and write raw bytes.
///
/// Paths are relative to the provider's root.
pub trait StorageProvider: Send + Sync + Debug {
    /// Check if a path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Create a directory and all its parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Read a file to a vector of bytes
    fn read_to_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write bytes to a file, replacing it atomically
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// List all entries in a directory
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}
