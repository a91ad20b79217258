//! # Tern Dependency Registry
//!
//! Maps component identifiers to instances. Components are described by
//! serializable [`ComponentDefinition`]s and constructed lazily, on first
//! lookup, by the factory registered for their `kind` in a
//! [`ComponentCatalog`]. Every instance is a singleton for the lifetime of
//! the registry.
//!
//! The serializable half of a registry is its [`RegistrySnapshot`], which is
//! what the kernel caches between process starts. Restoring a snapshot with
//! the same catalog yields a registry that behaves exactly like a fresh one.
pub mod builder;
pub mod catalog;
pub mod container;
pub mod definition;
pub mod error;

pub use builder::RegistryBuilder;
pub use catalog::{ComponentCatalog, Factory};
pub use container::{Instance, Registry, Resolver};
pub use definition::{ComponentDefinition, RegistrySnapshot, LISTENER_TAG};
pub use error::RegistryError;
