//! # Tern Kernel Errors
//!
//! Defines the error type shared by the kernel and every subsystem it
//! orchestrates.
//!
//! [`Error`] wraps the typed subsystem errors ([`RegistryError`],
//! [`CacheError`], [`StorageSystemError`]) and adds the kernel's own
//! lifecycle failures. Only the "no route" outcome of a dispatch is handled
//! locally by the kernel; every variant here is surfaced to the caller.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::cache::error::CacheError;
use crate::event::error::EventSystemError;
use crate::registry::error::RegistryError;
use crate::routing::error::RoutingError;
use crate::storage::error::StorageSystemError;

/// Custom error type for the Tern kernel
#[derive(Debug, ThisError)]
pub enum Error {
    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Dependency resolution or registry construction failure
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Cache store failure
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Event system error
    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    /// Route table could not be bound
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    /// A route handler failed. Handlers may return this or any other variant;
    /// the kernel propagates whatever the handler returned unchanged.
    #[error("Handler '{handler}' failed: {message}")]
    Handler { handler: String, message: String },

    /// Environment file could not be parsed
    #[error("Environment error for '{}': {message}", path.display())]
    Environment { path: PathBuf, message: String },

    /// Configuration file could not be read or parsed
    #[error("Config error for '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("RegistryInitialization")]
    RegistryInitialization,
    #[error("Start")]
    Start,
    #[error("Dispatch")]
    Dispatch,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// Wrap a failure that happened while the kernel was in `phase`.
    pub fn lifecycle(phase: KernelLifecyclePhase, message: impl Into<String>, source: Error) -> Self {
        Error::KernelLifecycleError {
            phase,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper to create an I/O error with context, wrapped as a storage error.
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::io(source, operation, path))
    }

    /// Convenience constructor for handler failures.
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Handler {
            handler: handler.into(),
            message: message.into(),
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
