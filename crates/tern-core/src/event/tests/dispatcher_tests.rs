use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::event::dispatcher::{deliver, EventDispatcher};
use crate::event::types::{KernelStartEvent, TestEvent};
use crate::event::EventResult;

#[test]
fn test_handler_ids_are_unique_and_increasing() {
    let mut dispatcher = EventDispatcher::new();

    let first = dispatcher.register_handler("a", |_| EventResult::Continue);
    let second = dispatcher.register_type_handler::<KernelStartEvent, _>(|_| EventResult::Continue);

    assert!(second > first);
    assert_eq!(dispatcher.name_handler_count(), 1);
    assert_eq!(dispatcher.type_handler_count(), 1);
}

#[test]
fn test_unregister_handler() {
    let mut dispatcher = EventDispatcher::new();
    let id = dispatcher.register_handler("a", |_| EventResult::Continue);

    assert!(dispatcher.unregister_handler(id));
    assert!(!dispatcher.unregister_handler(id), "Second unregister should report nothing removed");
    assert_eq!(dispatcher.name_handler_count(), 0);
}

#[test]
fn test_handlers_for_only_matches_name_or_type() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register_handler("test.one", |_| EventResult::Continue);
    dispatcher.register_handler("test.two", |_| EventResult::Continue);
    dispatcher.register_type_handler::<TestEvent, _>(|_| EventResult::Continue);
    dispatcher.register_type_handler::<KernelStartEvent, _>(|_| EventResult::Continue);

    let handlers = dispatcher.handlers_for(&TestEvent { name: "test.one" });

    assert_eq!(handlers.len(), 2, "One name handler plus one type handler");
}

#[tokio::test]
async fn test_deliver_stops_at_first_stop() {
    let mut dispatcher = EventDispatcher::new();
    let calls = Arc::new(AtomicU32::new(0));

    let c1 = calls.clone();
    dispatcher.register_handler("test.stop", move |_| {
        c1.fetch_add(1, Ordering::SeqCst);
        EventResult::Stop
    });
    let c2 = calls.clone();
    dispatcher.register_handler("test.stop", move |_| {
        c2.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    });

    let event = TestEvent { name: "test.stop" };
    let handlers = dispatcher.handlers_for(&event);
    let result = deliver(&handlers, &event).await;

    assert_eq!(result, EventResult::Stop);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "Second handler must not run after Stop");
}
