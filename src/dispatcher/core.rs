//! Dispatcher core: route lookup, callable resolution, invocation and failure routing.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use tracing::{debug, error, info, info_span, warn};

use crate::error::{DispatchError, HandlerError, RouteError};
use crate::handler::{Handler, Verb};
use crate::router::{Params, RouteMatch, Router};
use crate::server::{Request, Response};

/// Body of the fallback response for unmatched paths.
pub const NOT_FOUND_BODY: &str = "Not found";

/// Signature of the exception hook: receives the request, the response the failed handler was
/// writing, and the failure. Whatever it leaves in the response is sent.
pub type ExceptionHook = dyn Fn(&Request, &mut Response, &HandlerError) + Send + Sync;

/// Fallback for paths that match no route: status 404, text body `Not found`.
pub fn default_handler(_req: &Request, resp: &mut Response) {
    resp.set_status(404).text(NOT_FOUND_BODY);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Callable selected for a matched route.
enum Resolved<'a> {
    Function(&'a crate::handler::HandlerFn),
    Method(Verb, &'a dyn crate::handler::Resource),
}

/// Owns the route table and the optional exception hook.
///
/// The table is filled at startup through [`Dispatcher::register`] and only read afterwards, so
/// a `Dispatcher` can be shared across request coroutines behind an `Arc` without locking.
#[derive(Default, Clone)]
pub struct Dispatcher {
    router: Router,
    exception_hook: Option<Arc<ExceptionHook>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.router.templates())
            .field("exception_hook", &self.exception_hook.is_some())
            .finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dispatcher over an existing route table.
    #[must_use]
    pub fn with_router(router: Router) -> Self {
        Self {
            router,
            exception_hook: None,
        }
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Register `handler` under `template`. See [`Router::register`].
    ///
    /// # Errors
    ///
    /// Fails on duplicate or malformed templates.
    pub fn register(&mut self, template: &str, handler: Handler) -> Result<(), RouteError> {
        self.router.register(template, handler)
    }

    /// Install the exception hook. A later call replaces the earlier hook.
    pub fn set_exception_hook<F>(&mut self, hook: F)
    where
        F: Fn(&Request, &mut Response, &HandlerError) + Send + Sync + 'static,
    {
        if self.exception_hook.is_some() {
            warn!("Replacing existing exception hook");
        } else {
            info!("Exception hook registered");
        }
        self.exception_hook = Some(Arc::new(hook));
    }

    #[must_use]
    pub fn has_exception_hook(&self) -> bool {
        self.exception_hook.is_some()
    }

    /// Process one request.
    ///
    /// Unmatched paths get the [`default_handler`] response. Matched routes are resolved to a
    /// function or resource method and invoked with the captured params.
    ///
    /// # Errors
    ///
    /// * [`DispatchError::UnsupportedMethod`] - the route is a resource whose
    ///   [`Resource::verbs`](crate::handler::Resource::verbs) do not include `method`. Checked
    ///   before invocation and never routed to the exception hook.
    /// * [`DispatchError::Handler`] - the handler returned an error or panicked and no exception
    ///   hook is registered, or the exception hook itself panicked.
    pub fn handle(
        &self,
        method: &Method,
        path: &str,
        req: &Request,
        resp: &mut Response,
    ) -> Result<(), DispatchError> {
        let span = info_span!(
            "dispatch",
            request_id = %req.request_id,
            method = %method,
            path = %path
        );
        let _guard = span.enter();

        let Some(route_match) = self.router.lookup(path) else {
            debug!("Falling back to default handler");
            default_handler(req, resp);
            return Ok(());
        };

        let resolved = resolve(&route_match, method)?;

        let start = Instant::now();
        let outcome = invoke(resolved, req, resp, &route_match.path_params);
        let elapsed_us = start.elapsed().as_micros();

        let failure = match outcome {
            Ok(()) => {
                info!(
                    template = %route_match.template(),
                    status = resp.status,
                    execution_time_us = elapsed_us,
                    "Handler execution complete"
                );
                return Ok(());
            }
            Err(failure) => failure,
        };

        match &self.exception_hook {
            Some(hook) => {
                info!(
                    template = %route_match.template(),
                    error = %failure,
                    "Handler failed - invoking exception hook"
                );
                let hooked = catch_unwind(AssertUnwindSafe(|| hook(req, resp, &failure)));
                match hooked {
                    Ok(()) => Ok(()),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!(
                            template = %route_match.template(),
                            panic_message = %message,
                            "Exception hook panicked - propagating"
                        );
                        Err(DispatchError::Handler(HandlerError::Panicked(message)))
                    }
                }
            }
            None => {
                error!(
                    template = %route_match.template(),
                    error = %failure,
                    execution_time_us = elapsed_us,
                    "Handler failed - propagating"
                );
                Err(DispatchError::Handler(failure))
            }
        }
    }
}

fn resolve<'a>(route_match: &'a RouteMatch, method: &Method) -> Result<Resolved<'a>, DispatchError> {
    match &route_match.route.handler {
        Handler::Function(f) => Ok(Resolved::Function(f.as_ref())),
        Handler::Resource(resource) => match Verb::from_method(method) {
            Some(verb) if resource.supports(verb) => Ok(Resolved::Method(verb, resource.as_ref())),
            _ => {
                warn!(
                    template = %route_match.template(),
                    "Resource does not support method"
                );
                Err(DispatchError::UnsupportedMethod {
                    method: method.clone(),
                    template: route_match.template().to_string(),
                })
            }
        },
    }
}

fn invoke(
    resolved: Resolved<'_>,
    req: &Request,
    resp: &mut Response,
    params: &Params,
) -> Result<(), HandlerError> {
    let result = catch_unwind(AssertUnwindSafe(|| match resolved {
        Resolved::Function(f) => f(req, resp, params),
        Resolved::Method(verb, resource) => verb.call(resource, req, resp, params),
    }));
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(HandlerError::Failed(err)),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(panic_message = %message, "Handler panicked");
            Err(HandlerError::Panicked(message))
        }
    }
}
