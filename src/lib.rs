//! # kahless
//!
//! **kahless** is a small web framework: applications register path templates, map them to
//! handlers, and serve them over HTTP on the `may` coroutine runtime.
//!
//! ## Overview
//!
//! A request flows through three stages:
//!
//! 1. **Routing** - the [`router`] compiles templates such as `/hello/{name}` into anchored
//!    matchers and finds the first registered route matching the request path
//! 2. **Dispatch** - the [`dispatcher`] invokes the matched handler. Function handlers run for
//!    every method; [`Resource`] handlers are asked for the method-specific operation
//!    when they list the request verb
//! 3. **Failure handling** - handler errors and panics go to the application's exception hook
//!    when one is installed, otherwise they propagate to the caller
//!
//! Unmatched paths get the default handler's `404 Not found` response.
//!
//! ## Architecture
//!
//! - **[`router`]** - route templates, the ordered route table and path lookup
//! - **[`dispatcher`]** - handler invocation, method selection and the exception hook
//! - **[`handler`]** - function and resource handler types
//! - **[`app`]** - the [`Api`] object tying routes, templates and static assets together
//! - **[`server`]** - request/response types and the `may_minihttp` transport
//! - **[`templates`]** - minijinja rendering from a templates directory
//! - **[`static_files`]** - static asset serving under a URL prefix
//! - **[`testing`]** - in-process [`TestClient`](testing::TestClient)
//! - **[`runtime_config`]** / **[`logging`]** - YAML + environment configuration and `tracing`
//!   setup
//! - **[`cli`]** - `serve` and `routes` commands
//!
//! ## Quick Start
//!
//! ```rust
//! use kahless::{Api, Params, Request, Resource, Response, Verb};
//!
//! struct Books;
//!
//! impl Resource for Books {
//!     fn verbs(&self) -> &[Verb] {
//!         &[Verb::Get]
//!     }
//!
//!     fn get(&self, _req: &Request, resp: &mut Response, _params: &Params) -> kahless::HandlerResult {
//!         resp.text("Books page");
//!         Ok(())
//!     }
//! }
//!
//! let mut api = Api::new();
//! api.route("/hello/{name}", |_req, resp, params| {
//!     resp.text(format!("Hello, {}", params.get("name").unwrap_or_default()));
//!     Ok(())
//! })
//! .unwrap();
//! api.resource("/book", Books).unwrap();
//!
//! let client = api.test_session();
//! assert_eq!(client.get("/hello/kahless").unwrap().text(), "Hello, kahless");
//! assert_eq!(client.get("/book").unwrap().text(), "Books page");
//! assert_eq!(client.get("/nowhere").unwrap().status(), 404);
//! ```
//!
//! ## Serving
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kahless::{server::{AppService, HttpServer}, Api};
//!
//! let api = Arc::new(Api::new());
//! let handle = HttpServer(AppService::new(api)).start("127.0.0.1:8080").unwrap();
//! handle.join().unwrap();
//! ```
//!
//! Failures that escape dispatch (unsupported resource methods, handler errors without an
//! exception hook) are answered with `500 Internal Server Error` by the transport.

pub mod app;
pub mod cli;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod static_files;
pub mod templates;
pub mod testing;

pub use app::Api;
pub use error::{ConfigError, DispatchError, HandlerError, PatternError, RouteError, TemplateError};
pub use handler::{not_implemented, Handler, HandlerResult, MethodNotImplemented, Resource, Verb};
pub use router::{Params, RouteMatch, Router};
pub use server::{Request, Response};
