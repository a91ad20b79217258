pub mod error;
pub mod local;
pub mod provider;

/// Re-export key types
pub use error::StorageSystemError;
pub use local::LocalStorageProvider;
pub use provider::StorageProvider;
