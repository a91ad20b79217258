// Kernel and the collaborators it orchestrates
pub mod cache;
pub mod config;
pub mod event;
pub mod http;
pub mod kernel;
pub mod registry;
pub mod routing;
pub mod storage;

// Re-export key public types/traits for easier use by the binary and applications
pub use kernel::{BootstrapContext, Dispatch, Kernel};
pub use kernel::error::Error as KernelError;
pub use registry::{Instance, Registry};
pub use routing::{Arguments, Route, RouteHandler, Router};
pub use event::{Event, EventBus, EventListener, EventResult};
pub use cache::{CacheEntry, CachePool};
pub use http::{OutputChannel, Request, Response};
