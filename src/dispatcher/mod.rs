//! # Dispatcher Module
//!
//! The dispatcher is the single request-processing entry point. For every request it:
//! - Asks the [`Router`](crate::router::Router) for the first matching route
//! - Falls back to [`default_handler`] (404, `Not found`) when nothing matches
//! - Resolves the callable: the function itself, or the resource method when
//!   the resource lists the request verb
//! - Invokes it with the request, the response and the captured params
//! - Routes handler failures (returned errors and panics) to the exception hook, or propagates
//!   them when no hook is installed
//!
//! ## Request Flow
//!
//! ```text
//! RECEIVED ─┬─ UNMATCHED ── default response (404)
//!           └─ MATCHED ─┬─ RESOLUTION_FAILED ── Err(UnsupportedMethod)
//!                       └─ RESOLVED ── INVOKED ─┬─ SUCCEEDED
//!                                               └─ FAILED ─┬─ HANDLED_BY_HOOK
//!                                                          └─ PROPAGATED ── Err(Handler)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use kahless::dispatcher::Dispatcher;
//! use kahless::handler::Handler;
//! use kahless::server::{Request, Response};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .register("/boom", Handler::function(|_req, _resp, _params| {
//!         anyhow::bail!("database unavailable")
//!     }))
//!     .unwrap();
//! dispatcher.set_exception_hook(|_req, resp, err| {
//!     resp.set_status(503).text(format!("sorry: {err}"));
//! });
//!
//! let req = Request::new(Method::GET, "/boom");
//! let mut resp = Response::new();
//! dispatcher.handle(&req.method, &req.path, &req, &mut resp).unwrap();
//! assert_eq!(resp.status, 503);
//! assert_eq!(resp.text_body(), Some("sorry: database unavailable"));
//! ```
//!
//! ## Concurrency
//!
//! Dispatch is synchronous and lock-free: the route table is read-only once serving starts and
//! the exception hook is installed through `&mut` access beforehand. Resources are shared by
//! every request routed to them and must synchronize any interior state themselves.

mod core;

pub use core::{default_handler, Dispatcher, ExceptionHook, NOT_FOUND_BODY};
