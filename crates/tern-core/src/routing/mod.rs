//! # Tern Routing
//!
//! Maps a request path to a [`Route`]: the handler bound to that path and
//! the ordered registry identifiers the handler expects as arguments.
//!
//! Route tables are plain data ([`RouteDefinition`]) so they can travel in
//! the cached registry snapshot. Handlers are code and are looked up by name
//! in a [`HandlerTable`] when the router component is constructed, which is
//! how a route ends up carrying a ready-to-call handler.
pub mod error;
pub mod route;
pub mod router;

pub use error::RoutingError;
pub use route::{handler_fn, Arguments, Route, RouteHandler, SharedHandler};
pub use router::{normalize_path, HandlerTable, RouteDefinition, Router, RouterParameters};
