use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::event::{EventResult, RouteMatchedEvent, RouteNotFoundEvent};
use crate::http::{Request, Response, SharedOutput};
use crate::kernel::constants::{NOT_FOUND_BODY, NOT_FOUND_STATUS, OUTPUT_ID};
use crate::kernel::error::{Error, KernelLifecyclePhase};
use crate::kernel::tests::fixtures::Harness;
use crate::kernel::{Dispatch, Kernel};
use crate::registry::{ComponentDefinition, Instance, RegistryError};
use crate::routing::{handler_fn, Arguments, RouteDefinition, RoutingError, SharedHandler};

/// Handler that records the identifiers it was called with
fn recording_handler(calls: Arc<Mutex<Vec<Vec<String>>>>) -> SharedHandler {
    handler_fn(move |args: Arguments| {
        let calls = calls.clone();
        async move {
            let ids = args.ids().into_iter().map(str::to_string).collect();
            calls.lock().unwrap().push(ids);
            Ok::<(), Error>(())
        }
    })
}

#[tokio::test]
async fn test_unmatched_path_emits_not_found() {
    let harness = Harness::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let context = harness
        .builder()
        .factory("mailer", |_resolver, _definition| {
            let instance: Instance = Arc::new(());
            Ok(instance)
        })
        .component(ComponentDefinition::new("mailer", "mailer"))
        .route(RouteDefinition::new("/", "home").param("mailer"))
        .handler("home", recording_handler(calls.clone()))
        .build()
        .unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();

    let outcome = kernel.handle(&Request::get("/missing")).await.unwrap();

    assert_eq!(outcome, Dispatch::NotFound { path: "/missing".to_string() });
    assert!(calls.lock().unwrap().is_empty());
    assert!(!kernel.ensure_registry().unwrap().is_instantiated("mailer"));
    let response = harness.output.last().expect("a response should be emitted");
    assert_eq!(response.status(), NOT_FOUND_STATUS);
    assert_eq!(response.body(), NOT_FOUND_BODY);
    assert_eq!(harness.output.responses().len(), 1);
}

#[tokio::test]
async fn test_parameters_resolved_in_declared_order() {
    let harness = Harness::new();
    let constructed = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(Mutex::new(Vec::new()));
    let constructed_clone = constructed.clone();
    let context = harness
        .builder()
        .factory("recorder", move |_resolver, definition| {
            constructed_clone.lock().unwrap().push(definition.id.clone());
            let instance: Instance = Arc::new(definition.id.clone());
            Ok(instance)
        })
        .component(ComponentDefinition::new("b", "recorder"))
        .component(ComponentDefinition::new("a", "recorder"))
        .route(RouteDefinition::new("/report", "report").param("a").param("b"))
        .handler("report", recording_handler(calls.clone()))
        .build()
        .unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();

    let outcome = kernel.handle(&Request::get("/report")).await.unwrap();

    assert_eq!(
        outcome,
        Dispatch::Handled {
            path: "/report".to_string(),
            handler: "report".to_string(),
        }
    );
    assert_eq!(*constructed.lock().unwrap(), vec!["a", "b"]);
    assert_eq!(*calls.lock().unwrap(), vec![vec!["a".to_string(), "b".to_string()]]);
    assert!(harness.output.responses().is_empty());
}

#[tokio::test]
async fn test_handler_receives_resolved_instances() {
    let harness = Harness::new();
    let context = harness
        .builder()
        .route(RouteDefinition::new("/hello", "hello").param(OUTPUT_ID))
        .handler(
            "hello",
            handler_fn(|args: Arguments| async move {
                let output = args.get_as::<SharedOutput>(0)?;
                Response::ok("hello").respond(&**output)
            }),
        )
        .build()
        .unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();

    kernel.handle(&Request::get("/hello?name=tern")).await.unwrap();

    let response = harness.output.last().expect("handler should write a response");
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), "hello");
}

#[tokio::test]
async fn test_unknown_parameter_fails_before_invocation() {
    let harness = Harness::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let context = harness
        .builder()
        .route(RouteDefinition::new("/", "home").param("mailer"))
        .handler("home", recording_handler(calls.clone()))
        .build()
        .unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();

    let err = kernel.handle(&Request::get("/")).await.unwrap_err();

    assert!(matches!(err, Error::Registry(RegistryError::UnknownIdentifier { ref id }) if id == "mailer"));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_handler_error_propagates_unchanged() {
    let harness = Harness::new();
    let context = harness
        .builder()
        .route(RouteDefinition::new("/fail", "fail"))
        .handler("fail", handler_fn(|_args| async { Err::<(), Error>(Error::handler("fail", "exploded")) }))
        .build()
        .unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();

    let err = kernel.handle(&Request::get("/fail")).await.unwrap_err();

    match err {
        Error::Handler { handler, message } => {
            assert_eq!(handler, "fail");
            assert_eq!(message, "exploded");
        }
        other => panic!("expected the handler's own error, got {other:?}"),
    }
    assert!(harness.output.responses().is_empty());
}

#[tokio::test]
async fn test_route_events_are_published() {
    let harness = Harness::new();
    let context = harness
        .builder()
        .route(RouteDefinition::new("/", "home"))
        .handler("home", handler_fn(|_args| async { Ok::<(), Error>(()) }))
        .build()
        .unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();

    let matched = Arc::new(Mutex::new(Vec::new()));
    let not_found = Arc::new(AtomicU32::new(0));
    let bus = kernel.event_bus().unwrap();
    let matched_clone = matched.clone();
    bus.register_type_handler::<RouteMatchedEvent, _>(move |event| {
        matched_clone.lock().unwrap().push(event.handler.clone());
        EventResult::Continue
    })
    .unwrap();
    let not_found_clone = not_found.clone();
    bus.register_type_handler::<RouteNotFoundEvent, _>(move |_event| {
        not_found_clone.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    })
    .unwrap();

    kernel.handle(&Request::get("/")).await.unwrap();
    kernel.handle(&Request::get("/nowhere")).await.unwrap();

    assert_eq!(*matched.lock().unwrap(), vec!["home"]);
    assert_eq!(not_found.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_event_bus_is_memoized() {
    let harness = Harness::new();
    let mut kernel = Kernel::new(harness.builder().build().unwrap()).await.unwrap();

    let first = kernel.event_bus().unwrap();
    let second = kernel.event_bus().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_unbound_handler_fails_dispatch() {
    let harness = Harness::new();
    let context = harness.builder().route(RouteDefinition::new("/", "missing")).build().unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();

    let err = kernel.handle(&Request::get("/")).await.unwrap_err();

    match err {
        Error::KernelLifecycleError {
            phase: KernelLifecyclePhase::Dispatch,
            source: Some(source),
            ..
        } => {
            assert!(matches!(
                *source,
                Error::Routing(RoutingError::UnknownHandler { ref handler, .. }) if handler == "missing"
            ));
        }
        other => panic!("expected a dispatch lifecycle error, got {other:?}"),
    }
    assert!(harness.output.responses().is_empty());
}

#[tokio::test]
async fn test_route_events_carry_the_request() {
    let harness = Harness::new();
    let context = harness
        .builder()
        .route(RouteDefinition::new("/", "home"))
        .handler("home", handler_fn(|_args| async { Ok::<(), Error>(()) }))
        .build()
        .unwrap();
    let mut kernel = Kernel::new(context).await.unwrap();
    let methods = Arc::new(Mutex::new(Vec::new()));
    let bus = kernel.event_bus().unwrap();
    let matched_methods = methods.clone();
    bus.register_type_handler::<RouteMatchedEvent, _>(move |event| {
        matched_methods.lock().unwrap().push(format!("{} {}", event.request.method(), event.request.uri()));
        EventResult::Continue
    })
    .unwrap();
    let missing_methods = methods.clone();
    bus.register_type_handler::<RouteNotFoundEvent, _>(move |event| {
        missing_methods.lock().unwrap().push(format!("{} {}", event.request.method(), event.path));
        EventResult::Continue
    })
    .unwrap();

    kernel.handle(&Request::new("POST", "/?draft=1")).await.unwrap();
    kernel.handle(&Request::get("/nowhere?x=1")).await.unwrap();

    assert_eq!(*methods.lock().unwrap(), vec!["POST /?draft=1", "GET /nowhere"]);
}
