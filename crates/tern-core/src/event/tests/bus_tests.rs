use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::event::types::{KernelStartEvent, RouteMatchedEvent, TestEvent};
use crate::event::{Event, EventBus, EventListener, EventResult, RouteLogListener};
use crate::http::Request;

struct CountingListener {
    event: &'static str,
    seen: Arc<AtomicU32>,
}

#[async_trait]
impl EventListener for CountingListener {
    fn listens_to(&self) -> &'static str {
        self.event
    }

    async fn on_event(&self, _event: &dyn Event) -> EventResult {
        self.seen.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    }
}

#[tokio::test]
async fn test_dispatch_reaches_name_handler() {
    let bus = EventBus::new();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();
    bus.register_handler("test.event", move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    })
    .unwrap();

    let result = bus.dispatch(&TestEvent { name: "test.event" }).await.unwrap();

    assert_eq!(result, EventResult::Continue);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dispatch_ignores_other_names() {
    let bus = EventBus::new();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();
    bus.register_handler("test.event", move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    })
    .unwrap();

    bus.dispatch(&TestEvent { name: "other.event" }).await.unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_typed_handler_receives_concrete_event() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(None));
    let seen_clone = seen.clone();
    bus.register_type_handler::<KernelStartEvent, _>(move |event| {
        *seen_clone.lock().unwrap() = Some(event.timestamp);
        EventResult::Continue
    })
    .unwrap();

    let event = KernelStartEvent::now();
    bus.dispatch(&event).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), Some(event.timestamp));
}

#[tokio::test]
async fn test_subscribed_listener_is_called_once_per_dispatch() {
    let bus = EventBus::new();
    let seen = Arc::new(AtomicU32::new(0));
    bus.subscribe(Arc::new(CountingListener { event: KernelStartEvent::NAME, seen: seen.clone() }))
        .unwrap();

    bus.dispatch(&KernelStartEvent::now()).await.unwrap();
    bus.dispatch(&KernelStartEvent::now()).await.unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(bus.handler_count(), 1);
}

#[tokio::test]
async fn test_unsubscribed_listener_is_not_called() {
    let bus = EventBus::new();
    let seen = Arc::new(AtomicU32::new(0));
    let id = bus
        .subscribe(Arc::new(CountingListener { event: "test.event", seen: seen.clone() }))
        .unwrap();

    assert!(bus.unregister_handler(id).unwrap());
    bus.dispatch(&TestEvent { name: "test.event" }).await.unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_route_log_listener_continues_propagation() {
    let listener = RouteLogListener;
    let event = RouteMatchedEvent {
        request: Request::get("/?page=2"),
        path: "/".to_string(),
        handler: "home".to_string(),
        params: vec!["output".to_string()],
    };

    assert_eq!(listener.listens_to(), RouteMatchedEvent::NAME);
    assert_eq!(listener.on_event(&event).await, EventResult::Continue);
}
