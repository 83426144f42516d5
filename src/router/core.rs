//! Route table core: ordered registration and first-match lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::pattern::RoutePattern;
use crate::error::RouteError;
use crate::handler::Handler;

/// Maximum number of captured params before heap allocation.
/// Most routes have ≤4 captures (e.g., /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured parameter storage. Names are shared with the compiled pattern.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Lookups slower than this are logged at warn level.
const SLOW_MATCH: Duration = Duration::from_millis(1);

/// Named path parameters extracted from a matched route, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamVec);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter by capture name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Capture names in template order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a HashMap. Note: this allocates; prefer [`Params::get`].
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl From<ParamVec> for Params {
    fn from(v: ParamVec) -> Self {
        Self(v)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (Arc::from(k), v.to_string()))
                .collect(),
        )
    }
}

/// A registered route: one compiled pattern bound to one handler.
pub struct RouteEntry {
    pub pattern: RoutePattern,
    pub handler: Handler,
}

impl RouteEntry {
    #[must_use]
    pub fn template(&self) -> &str {
        self.pattern.raw()
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("template", &self.template())
            .field("handler", &self.handler.kind())
            .finish()
    }
}

/// Result of successfully matching a request path to a route.
///
/// Two matches are equal when they select the same template and carry equal params.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteEntry>,
    pub path_params: Params,
}

impl RouteMatch {
    #[must_use]
    pub fn template(&self) -> &str {
        self.route.template()
    }

    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }
}

impl PartialEq for RouteMatch {
    fn eq(&self, other: &Self) -> bool {
        self.template() == other.template() && self.path_params == other.path_params
    }
}

impl Eq for RouteMatch {}

/// Ordered route table.
///
/// Built once at startup through [`Router::register`], read-only while serving. Templates are
/// unique, so the first match is also the only match.
#[derive(Default, Clone)]
pub struct Router {
    routes: Vec<Arc<RouteEntry>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `template`.
    ///
    /// # Errors
    ///
    /// * [`RouteError::Duplicate`] if the raw template string is already registered.
    /// * [`RouteError::InvalidTemplate`] if the template does not compile.
    pub fn register(&mut self, template: &str, handler: Handler) -> Result<(), RouteError> {
        if self.routes.iter().any(|r| r.template() == template) {
            warn!(template = %template, "Duplicate route registration rejected");
            return Err(RouteError::Duplicate(template.to_string()));
        }
        let pattern = RoutePattern::compile(template)?;

        info!(
            template = %template,
            handler_kind = handler.kind(),
            params = ?pattern.param_names(),
            routes_count = self.routes.len() + 1,
            "Route registered"
        );

        self.routes.push(Arc::new(RouteEntry { pattern, handler }));
        Ok(())
    }

    /// Find the first route whose pattern matches `path`.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - the matched route with its extracted params
    /// * `None` - no route matches (results in 404)
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<RouteMatch> {
        debug!(path = %path, routes_count = self.routes.len(), "Route match attempt");

        let match_start = Instant::now();
        let found = self
            .routes
            .iter()
            .find_map(|route| route.pattern.extract(path).map(|p| (route, p)));
        let match_duration = match_start.elapsed();

        match found {
            Some((route, params)) => {
                if match_duration > SLOW_MATCH {
                    warn!(
                        path = %path,
                        template = %route.template(),
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        path = %path,
                        template = %route.template(),
                        path_params = ?params,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
                Some(RouteMatch {
                    route: Arc::clone(route),
                    path_params: Params::from(params),
                })
            }
            None => {
                warn!(
                    path = %path,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
                None
            }
        }
    }

    /// Registered templates in lookup order.
    #[must_use]
    pub fn templates(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.template()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!("[route] {} -> {}", route.template(), route.handler.kind());
        }
    }
}
