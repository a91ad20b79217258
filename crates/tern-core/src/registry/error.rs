//! # Tern Registry Errors
//!
//! [`RegistryError`] covers both dependency resolution failures at lookup
//! time and validation failures while a registry is being built or restored.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No component is bound to identifier '{id}'")]
    UnknownIdentifier { id: String },

    #[error("Component '{id}' is not of the requested type {expected}")]
    TypeMismatch { id: String, expected: &'static str },

    #[error("Circular dependency detected: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    #[error("Component '{id}' uses kind '{kind}' which has no registered factory")]
    UnknownKind { id: String, kind: String },

    #[error("Component '{id}' depends on '{dependency}' which is not defined")]
    MissingDependency { id: String, dependency: String },

    #[error("Component identifier '{id}' is defined more than once")]
    DuplicateIdentifier { id: String },

    #[error("Component identifier '{id}' is reserved for the kernel")]
    ReservedIdentifier { id: String },

    #[error("Invalid parameters for component '{id}': {message}")]
    InvalidParameters { id: String, message: String },

    #[error("Registry instance table lock poisoned")]
    LockPoisoned,
}
