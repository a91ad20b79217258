use std::sync::Arc;

use async_trait::async_trait;

use crate::event::types::RouteMatchedEvent;
use crate::event::{Event, EventListener, EventResult, SharedListener};
use crate::registry::Instance;

/// Wrap a listener so it can be returned from a registry factory and picked
/// up by the event bus.
pub fn listener_instance<L: EventListener + 'static>(listener: L) -> Instance {
    let shared: SharedListener = Arc::new(listener);
    Arc::new(shared)
}

/// Logs every matched route with its handler and parameter identifiers
#[derive(Debug, Default)]
pub struct RouteLogListener;

#[async_trait]
impl EventListener for RouteLogListener {
    fn listens_to(&self) -> &'static str {
        RouteMatchedEvent::NAME
    }

    async fn on_event(&self, event: &dyn Event) -> EventResult {
        if let Some(matched) = event.as_any().downcast_ref::<RouteMatchedEvent>() {
            log::info!(
                "Route {} {} was found with {}({})",
                matched.request.method(),
                matched.path,
                matched.handler,
                matched.params.join(",")
            );
        }
        EventResult::Continue
    }
}
