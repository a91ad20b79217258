use std::fmt;
use std::sync::RwLock;

use crate::event::dispatcher::{self, EventDispatcher};
use crate::event::error::EventSystemError;
use crate::event::{Event, EventId, EventResult, SharedListener};
use crate::kernel::error::Result;

/// Shared event bus component.
///
/// Registration is synchronous so factories can subscribe listeners while the
/// registry builds the bus. Dispatch snapshots the matching handlers and
/// awaits them in order after releasing the table lock, so handlers may
/// register further handlers without deadlocking.
pub struct EventBus {
    dispatcher: RwLock<EventDispatcher>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dispatcher.read() {
            Ok(dispatcher) => f.debug_struct("EventBus").field("dispatcher", &*dispatcher).finish(),
            Err(_) => f.debug_struct("EventBus").finish_non_exhaustive(),
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            dispatcher: RwLock::new(EventDispatcher::new()),
        }
    }

    fn poisoned() -> EventSystemError {
        EventSystemError::DispatcherPoisoned {
            component: "handlers_map".to_string(),
        }
    }

    /// Register a synchronous handler for events with a specific name
    pub fn register_handler<F>(&self, event_name: &'static str, handler: F) -> Result<EventId>
    where
        F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static,
    {
        let mut dispatcher = self.dispatcher.write().map_err(|_| Self::poisoned())?;
        Ok(dispatcher.register_handler(event_name, handler))
    }

    /// Register a synchronous handler for events of a specific type
    pub fn register_type_handler<E, F>(&self, handler: F) -> Result<EventId>
    where
        E: Event + 'static,
        F: Fn(&E) -> EventResult + Send + Sync + 'static,
    {
        let mut dispatcher = self.dispatcher.write().map_err(|_| Self::poisoned())?;
        Ok(dispatcher.register_type_handler::<E, F>(handler))
    }

    /// Subscribe a listener component to the event it declares
    pub fn subscribe(&self, listener: SharedListener) -> Result<EventId> {
        let mut dispatcher = self.dispatcher.write().map_err(|_| Self::poisoned())?;
        let event_name = listener.listens_to();
        let id = dispatcher.register_listener(listener);
        log::debug!("Subscribed listener {} to '{}'", id, event_name);
        Ok(id)
    }

    /// Unregister a handler by its ID
    pub fn unregister_handler(&self, id: EventId) -> Result<bool> {
        let mut dispatcher = self.dispatcher.write().map_err(|_| Self::poisoned())?;
        Ok(dispatcher.unregister_handler(id))
    }

    /// Deliver `event` to every matching handler before returning
    pub async fn dispatch(&self, event: &dyn Event) -> Result<EventResult> {
        let handlers = {
            let dispatcher = self.dispatcher.read().map_err(|_| Self::poisoned())?;
            dispatcher.handlers_for(event)
        };
        log::debug!("Dispatching '{}' to {} handler(s)", event.name(), handlers.len());
        Ok(dispatcher::deliver(&handlers, event).await)
    }

    /// Total number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.dispatcher
            .read()
            .map(|dispatcher| dispatcher.name_handler_count() + dispatcher.type_handler_count())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
