use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::event::{AsyncEventHandler, Event, EventId, EventResult, SharedListener};

type HandlerList = Vec<(EventId, Arc<dyn AsyncEventHandler>)>;

/// Handler table keyed by event name and by event type.
///
/// The table itself is synchronous; [`EventBus`](crate::event::EventBus)
/// wraps it in a lock and awaits handlers outside that lock.
pub struct EventDispatcher {
    handlers: HashMap<&'static str, HandlerList>,
    type_handlers: HashMap<TypeId, HandlerList>,
    next_handler_id: EventId,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("name_handlers_count", &self.name_handler_count())
            .field("type_handlers_count", &self.type_handler_count())
            .field("next_handler_id", &self.next_handler_id)
            .finish()
    }
}

/// Synchronous closure keyed by event name (Internal Helper)
struct SyncHandler<F> {
    handler: F,
}

#[async_trait]
impl<F> AsyncEventHandler for SyncHandler<F>
where
    F: Fn(&dyn Event) -> EventResult + Send + Sync,
{
    async fn handle(&self, event: &dyn Event) -> EventResult {
        (self.handler)(event)
    }
}

/// Synchronous closure for one concrete event type (Internal Helper)
struct TypedHandler<E, F> {
    handler: F,
    _event: PhantomData<fn(&E)>,
}

#[async_trait]
impl<E, F> AsyncEventHandler for TypedHandler<E, F>
where
    E: Event + 'static,
    F: Fn(&E) -> EventResult + Send + Sync,
{
    async fn handle(&self, event: &dyn Event) -> EventResult {
        match event.as_any().downcast_ref::<E>() {
            Some(e) => (self.handler)(e),
            None => EventResult::Continue,
        }
    }
}

/// Adapter from a registry listener component (Internal Helper)
struct ListenerHandler {
    listener: SharedListener,
}

#[async_trait]
impl AsyncEventHandler for ListenerHandler {
    async fn handle(&self, event: &dyn Event) -> EventResult {
        self.listener.on_event(event).await
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            type_handlers: HashMap::new(),
            next_handler_id: 1,
        }
    }

    fn next_id(&mut self) -> EventId {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        id
    }

    pub fn register_handler<F>(&mut self, event_name: &'static str, handler: F) -> EventId
    where
        F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.handlers
            .entry(event_name)
            .or_default()
            .push((id, Arc::new(SyncHandler { handler })));
        id
    }

    pub fn register_type_handler<E, F>(&mut self, handler: F) -> EventId
    where
        E: Event + 'static,
        F: Fn(&E) -> EventResult + Send + Sync + 'static,
    {
        let id = self.next_id();
        let handler = TypedHandler::<E, F> {
            handler,
            _event: PhantomData,
        };
        self.type_handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    pub fn register_listener(&mut self, listener: SharedListener) -> EventId {
        let id = self.next_id();
        let event_name = listener.listens_to();
        self.handlers
            .entry(event_name)
            .or_default()
            .push((id, Arc::new(ListenerHandler { listener })));
        id
    }

    pub fn unregister_handler(&mut self, id: EventId) -> bool {
        let mut found = false;
        for handlers in self.handlers.values_mut().chain(self.type_handlers.values_mut()) {
            let len_before = handlers.len();
            handlers.retain(|(h_id, _)| *h_id != id);
            if handlers.len() < len_before {
                found = true;
            }
        }
        found
    }

    /// Handlers for `event` in delivery order: name handlers in registration
    /// order, then type handlers in registration order.
    pub fn handlers_for(&self, event: &dyn Event) -> Vec<Arc<dyn AsyncEventHandler>> {
        let by_name = self.handlers.get(event.name()).into_iter().flatten();
        let by_type = self
            .type_handlers
            .get(&event.as_any().type_id())
            .into_iter()
            .flatten();
        by_name.chain(by_type).map(|(_, handler)| handler.clone()).collect()
    }

    pub fn name_handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn type_handler_count(&self) -> usize {
        self.type_handlers.values().map(Vec::len).sum()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `handlers` in order, stopping at the first one that returns `Stop`
pub async fn deliver(handlers: &[Arc<dyn AsyncEventHandler>], event: &dyn Event) -> EventResult {
    for handler in handlers {
        if handler.handle(event).await == EventResult::Stop {
            return EventResult::Stop;
        }
    }
    EventResult::Continue
}
