//! # Tern Event System
//!
//! Publish-only notification of lifecycle milestones. Publishers call
//! [`EventBus::dispatch`] and every matching handler has run by the time the
//! call returns.
//!
//! Handlers come in three shapes: synchronous closures keyed by event name,
//! typed closures keyed by the event's concrete type, and [`EventListener`]
//! components that the kernel subscribes automatically when they are tagged
//! as listeners in the registry.
pub mod bus;
pub mod dispatcher;
pub mod error;
pub mod listeners;
pub mod types;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Type for event handler identifiers
pub type EventId = u64;

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was processed successfully and propagation should continue
    Continue,
    /// Event was processed and propagation should stop
    Stop,
}

/// Core event trait
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// Get the name of this event
    fn name(&self) -> &'static str;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Asynchronous event handler trait
#[async_trait]
pub trait AsyncEventHandler: Send + Sync {
    async fn handle(&self, event: &dyn Event) -> EventResult;
}

/// A registry component reacting to one named event
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Name of the event this listener is subscribed to
    fn listens_to(&self) -> &'static str;

    async fn on_event(&self, event: &dyn Event) -> EventResult;
}

/// Listener handle as stored in the registry
pub type SharedListener = Arc<dyn EventListener>;

/// Re-export important types
pub use bus::EventBus;
pub use dispatcher::EventDispatcher;
pub use error::EventSystemError;
pub use listeners::{listener_instance, RouteLogListener};
pub use types::{KernelStartEvent, RouteMatchedEvent, RouteNotFoundEvent};

// Test module declaration
#[cfg(test)]
mod tests;
