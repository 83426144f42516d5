//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route templates (e.g., `/hello/{name}`) into anchored regex matchers
//! - Enforcing that every raw template is registered at most once
//! - Matching incoming paths against routes in registration order
//! - Extracting named path parameters from the matched route
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: at registration, templates are parsed into literal and capture segments
//!    and turned into regex patterns (see [`RoutePattern`]).
//!
//! 2. **Matching**: for each request, the path is tested against every compiled pattern in
//!    registration order until one matches, returning the route and its captured params.
//!
//! ## Example
//!
//! ```rust
//! use kahless::handler::Handler;
//! use kahless::router::Router;
//!
//! let mut router = Router::new();
//! router
//!     .register("/hello/{name}", Handler::function(|_req, resp, params| {
//!         resp.text(format!("Hello, {}", params.get("name").unwrap_or_default()));
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! let m = router.lookup("/hello/ashley").unwrap();
//! assert_eq!(m.get_path_param("name"), Some("ashley"));
//! assert!(router.lookup("/bye/ashley").is_none());
//! ```
//!
//! ## Performance
//!
//! Lookup is O(n) in the number of routes. Route tables are small and fixed at startup, so
//! no caching is performed.

mod core;
mod pattern;

pub use core::{Params, ParamVec, RouteEntry, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use pattern::{RoutePattern, Segment};
