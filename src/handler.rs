//! Handler types: plain functions and verb-dispatched resources.

use std::fmt;
use std::sync::Arc;

use http::Method;

use crate::router::Params;
use crate::server::{Request, Response};

/// Return type of every handler. Any error is a handler failure.
pub type HandlerResult = anyhow::Result<()>;

/// Signature of a function handler.
pub type HandlerFn = dyn Fn(&Request, &mut Response, &Params) -> HandlerResult + Send + Sync;

/// Error returned by the default [`Resource`] verb methods.
///
/// Only reached when a resource lists a verb in [`Resource::verbs`] without overriding its
/// method; it is then an ordinary handler failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("method not implemented")]
pub struct MethodNotImplemented;

/// The error every unimplemented resource method returns.
pub fn not_implemented() -> HandlerResult {
    Err(MethodNotImplemented.into())
}

/// A class-based handler: one method per HTTP verb.
///
/// [`Resource::verbs`] declares which verbs the resource answers; the dispatcher reports any
/// other verb as unsupported without calling into the resource. A single instance is created
/// at registration and shared by every request routed to it, so implementations must not keep
/// per-request state.
///
/// ```rust
/// use kahless::handler::{HandlerResult, Resource, Verb};
/// use kahless::router::Params;
/// use kahless::server::{Request, Response};
///
/// struct Books;
///
/// impl Resource for Books {
///     fn verbs(&self) -> &[Verb] {
///         &[Verb::Get]
///     }
///
///     fn get(&self, _req: &Request, resp: &mut Response, _params: &Params) -> HandlerResult {
///         resp.text("Books page");
///         Ok(())
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait Resource: Send + Sync + 'static {
    /// Verbs this resource answers.
    fn verbs(&self) -> &[Verb];

    fn supports(&self, verb: Verb) -> bool {
        self.verbs().contains(&verb)
    }

    fn get(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        not_implemented()
    }
    fn post(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        not_implemented()
    }
    fn put(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        not_implemented()
    }
    fn patch(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        not_implemented()
    }
    fn delete(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        not_implemented()
    }
    fn head(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        not_implemented()
    }
    fn options(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        not_implemented()
    }
}

/// Verbs a [`Resource`] can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Verb {
    /// Map an HTTP method onto the closed verb set. Anything else (TRACE, CONNECT, extension
    /// methods) has no resource method.
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Verb::Get),
            Method::POST => Some(Verb::Post),
            Method::PUT => Some(Verb::Put),
            Method::PATCH => Some(Verb::Patch),
            Method::DELETE => Some(Verb::Delete),
            Method::HEAD => Some(Verb::Head),
            Method::OPTIONS => Some(Verb::Options),
            _ => None,
        }
    }

    /// Invoke the matching method on `resource`.
    pub fn call(
        self,
        resource: &dyn Resource,
        req: &Request,
        resp: &mut Response,
        params: &Params,
    ) -> HandlerResult {
        match self {
            Verb::Get => resource.get(req, resp, params),
            Verb::Post => resource.post(req, resp, params),
            Verb::Put => resource.put(req, resp, params),
            Verb::Patch => resource.patch(req, resp, params),
            Verb::Delete => resource.delete(req, resp, params),
            Verb::Head => resource.head(req, resp, params),
            Verb::Options => resource.options(req, resp, params),
        }
    }
}

/// What a route is bound to.
#[derive(Clone)]
pub enum Handler {
    Function(Arc<HandlerFn>),
    Resource(Arc<dyn Resource>),
}

impl Handler {
    /// Wrap a closure or fn item.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Request, &mut Response, &Params) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Function(Arc::new(f))
    }

    /// Wrap a resource instance.
    pub fn resource<R: Resource>(resource: R) -> Self {
        Handler::Resource(Arc::new(resource))
    }

    /// Short label used in logs and route listings.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Handler::Function(_) => "function",
            Handler::Resource(_) => "resource",
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PostOnly;

    impl Resource for PostOnly {
        fn verbs(&self) -> &[Verb] {
            &[Verb::Post]
        }

        fn post(&self, _req: &Request, resp: &mut Response, _params: &Params) -> HandlerResult {
            resp.text("posted");
            Ok(())
        }
    }

    #[test]
    fn test_verb_from_method() {
        assert_eq!(Verb::from_method(&Method::GET), Some(Verb::Get));
        assert_eq!(Verb::from_method(&Method::DELETE), Some(Verb::Delete));
        assert_eq!(Verb::from_method(&Method::TRACE), None);
    }

    #[test]
    fn test_default_methods_not_implemented() {
        let req = Request::new(Method::GET, "/book");
        let mut resp = Response::new();
        let err = Verb::Get
            .call(&PostOnly, &req, &mut resp, &Params::new())
            .unwrap_err();
        assert!(err.is::<MethodNotImplemented>());

        Verb::Post
            .call(&PostOnly, &req, &mut resp, &Params::new())
            .unwrap();
        assert_eq!(resp.text_body(), Some("posted"));
    }

    #[test]
    fn test_supports_follows_verbs() {
        assert!(PostOnly.supports(Verb::Post));
        assert!(!PostOnly.supports(Verb::Get));
    }

    #[test]
    fn test_handler_kind() {
        assert_eq!(Handler::resource(PostOnly).kind(), "resource");
        assert_eq!(Handler::function(|_, _, _| Ok(())).kind(), "function");
    }
}
