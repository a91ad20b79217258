//! # Tern Storage System Errors
//!
//! Defines [`StorageSystemError`], raised by storage providers when file I/O
//! or path handling fails. The file-backed cache store sits on top of these.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage operation '{operation}' failed for path '{}': {message}", path.display())]
    OperationFailed {
        operation: String,
        path: PathBuf,
        message: String,
    },
}

// Helper for creating Io errors, ensuring path is always included.
impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
