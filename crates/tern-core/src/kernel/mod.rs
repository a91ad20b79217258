//! # Tern Kernel
//!
//! Bootstraps an application from a [`BootstrapContext`] and dispatches
//! requests to route handlers.
//!
//! Construction runs three steps in order: error reporting is installed, the
//! registry is restored from the cache (or built and cached), and
//! [`KernelStartEvent`](crate::event::KernelStartEvent) is published. After
//! that [`Kernel::handle`] routes requests, resolving each handler's
//! parameters from the registry.
pub mod bootstrap;
pub mod constants;
pub mod context;
pub mod env;
pub mod error;
pub mod error_handler;

pub use bootstrap::{resolve_arguments, Dispatch, Kernel};
pub use context::{BootstrapContext, ContextBuilder};
pub use env::{DotenvSource, EnvSource, EnvironmentMap, StaticEnvSource};
pub use error::{Error, KernelLifecyclePhase, Result};
pub use error_handler::ErrorHandler;

#[cfg(test)]
mod tests;
