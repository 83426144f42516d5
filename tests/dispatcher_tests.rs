use http::Method;
use kahless::dispatcher::{Dispatcher, NOT_FOUND_BODY};
use kahless::{
    DispatchError, Handler, HandlerError, HandlerResult, Params, Request, Resource, Response, Verb,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Counter {
    gets: AtomicUsize,
}

impl Resource for Counter {
    fn verbs(&self) -> &[Verb] {
        &[Verb::Get]
    }

    fn get(&self, _req: &Request, resp: &mut Response, _params: &Params) -> HandlerResult {
        let n = self.gets.fetch_add(1, Ordering::SeqCst) + 1;
        resp.text(n.to_string());
        Ok(())
    }
}

fn dispatch(d: &Dispatcher, method: Method, path: &str) -> (Result<(), DispatchError>, Response) {
    let req = Request::new(method.clone(), path);
    let mut resp = Response::new();
    let result = d.handle(&method, path, &req, &mut resp);
    (result, resp)
}

#[test]
fn test_unmatched_path_gets_default_handler() {
    let d = Dispatcher::new();
    let (result, resp) = dispatch(&d, Method::GET, "/missing");
    assert!(result.is_ok());
    assert_eq!(resp.status, 404);
    assert_eq!(resp.text_body(), Some(NOT_FOUND_BODY));
}

#[test]
fn test_unmatched_path_never_invokes_hook() {
    let mut d = Dispatcher::new();
    d.set_exception_hook(|_req, resp, _err| {
        resp.text("hook");
    });
    let (result, resp) = dispatch(&d, Method::POST, "/missing");
    assert!(result.is_ok());
    assert_eq!(resp.text_body(), Some(NOT_FOUND_BODY));
}

#[test]
fn test_resource_instance_is_shared_across_requests() {
    let mut d = Dispatcher::new();
    d.register("/count", Handler::resource(Counter::default())).unwrap();

    for expected in ["1", "2", "3"] {
        let (result, resp) = dispatch(&d, Method::GET, "/count");
        result.unwrap();
        assert_eq!(resp.text_body(), Some(expected));
    }
}

#[test]
fn test_resource_method_outside_verb_set() {
    let mut d = Dispatcher::new();
    d.register("/count", Handler::resource(Counter::default())).unwrap();
    let (result, _) = dispatch(&d, Method::TRACE, "/count");
    assert!(matches!(
        result,
        Err(DispatchError::UnsupportedMethod { method, .. }) if method == Method::TRACE
    ));
}

#[test]
fn test_function_returning_marker_is_a_handler_failure() {
    let mut d = Dispatcher::new();
    d.register(
        "/fn",
        Handler::function(|_req, _resp, _params| kahless::not_implemented()),
    )
    .unwrap();
    let (result, _) = dispatch(&d, Method::GET, "/fn");
    assert!(matches!(result, Err(DispatchError::Handler(_))));
}

#[test]
fn test_hook_sees_partial_response() {
    let mut d = Dispatcher::new();
    d.register(
        "/partial",
        Handler::function(|_req, resp, _params| {
            resp.set_header("X-Stage", "started");
            Err(anyhow::anyhow!("halfway"))
        }),
    )
    .unwrap();
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_hook = Arc::clone(&seen);
    d.set_exception_hook(move |_req, resp, err| {
        seen_hook.fetch_add(1, Ordering::SeqCst);
        assert_eq!(resp.get_header("x-stage"), Some("started"));
        assert_eq!(err.to_string(), "halfway");
        resp.set_status(500).text("handled");
    });

    let (result, resp) = dispatch(&d, Method::GET, "/partial");
    assert!(result.is_ok());
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(resp.status, 500);
    assert_eq!(resp.text_body(), Some("handled"));
}

#[test]
fn test_params_reach_handler() {
    let mut d = Dispatcher::new();
    d.register(
        "/users/{user_id}/posts/{post_id}",
        Handler::function(|_req, resp, params| {
            resp.text(format!(
                "{}:{}",
                params.get("user_id").unwrap_or_default(),
                params.get("post_id").unwrap_or_default()
            ));
            Ok(())
        }),
    )
    .unwrap();
    let (result, resp) = dispatch(&d, Method::GET, "/users/5/posts/abc");
    result.unwrap();
    assert_eq!(resp.text_body(), Some("5:abc"));
}

/// Lists POST but forwards to a resource that never implemented it.
struct Forwarding;

impl Resource for Forwarding {
    fn verbs(&self) -> &[Verb] {
        &[Verb::Get, Verb::Post]
    }

    fn post(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        Counter::default().post(req, resp, params)
    }
}

#[test]
fn test_listed_verb_failing_with_marker_reaches_hook() {
    let mut d = Dispatcher::new();
    d.register("/book", Handler::resource(Forwarding)).unwrap();
    d.set_exception_hook(|_req, resp, err| {
        assert!(err.downcast_ref::<kahless::MethodNotImplemented>().is_some());
        resp.set_status(501).text("hooked");
    });

    let (result, resp) = dispatch(&d, Method::POST, "/book");
    assert!(result.is_ok());
    assert_eq!(resp.status, 501);
    assert_eq!(resp.text_body(), Some("hooked"));

    // GET is listed but not overridden: an invocation failure like any other.
    let (result, resp) = dispatch(&d, Method::GET, "/book");
    assert!(result.is_ok());
    assert_eq!(resp.text_body(), Some("hooked"));
}

#[test]
fn test_unlisted_verb_is_rejected_before_invocation() {
    let counter = Arc::new(AtomicUsize::new(0));

    struct Guarded(Arc<AtomicUsize>);

    impl Resource for Guarded {
        fn verbs(&self) -> &[Verb] {
            &[Verb::Get]
        }

        fn put(&self, _req: &Request, _resp: &mut Response, _params: &Params) -> HandlerResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let mut d = Dispatcher::new();
    d.register("/guarded", Handler::resource(Guarded(Arc::clone(&counter))))
        .unwrap();
    d.set_exception_hook(|_req, resp, _err| {
        resp.text("hook");
    });

    let (result, _) = dispatch(&d, Method::PUT, "/guarded");
    assert!(matches!(result, Err(DispatchError::UnsupportedMethod { .. })));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_panicking_hook_propagates() {
    let mut d = Dispatcher::new();
    d.register(
        "/fail",
        Handler::function(|_req, _resp, _params| Err(anyhow::anyhow!("first"))),
    )
    .unwrap();
    d.set_exception_hook(|_req, _resp, _err| panic!("hook exploded"));

    let (result, _) = dispatch(&d, Method::GET, "/fail");
    match result {
        Err(DispatchError::Handler(HandlerError::Panicked(msg))) => {
            assert_eq!(msg, "hook exploded");
        }
        other => panic!("expected hook panic to propagate, got {other:?}"),
    }
}
