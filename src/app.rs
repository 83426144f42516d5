//! The application object: route registration, templates, static assets and request entry.

use std::fmt;
use std::sync::Arc;

use http::Method;
use serde::Serialize;
use tracing::{debug, info};

use crate::dispatcher::{default_handler, Dispatcher};
use crate::error::{DispatchError, HandlerError, RouteError, TemplateError};
use crate::handler::{Handler, HandlerResult, Resource};
use crate::router::{Params, Router};
use crate::runtime_config::AppConfig;
use crate::server::{Request, Response};
use crate::static_files::StaticFiles;
use crate::templates::Templates;
use crate::testing::TestClient;

/// A kahless application.
///
/// Register routes and the exception hook during startup (`&mut self`), then share the `Api`
/// (typically behind an `Arc`) with the transport. Request processing only needs `&self`.
///
/// ```rust
/// use kahless::Api;
///
/// let mut api = Api::new();
/// api.route("/hello/{name}", |_req, resp, params| {
///     resp.text(format!("hey {}", params.get("name").unwrap_or_default()));
///     Ok(())
/// })
/// .unwrap();
///
/// let client = api.test_session();
/// assert_eq!(client.get("/hello/matthew").unwrap().text(), "hey matthew");
/// ```
pub struct Api {
    config: AppConfig,
    dispatcher: Dispatcher,
    templates: Arc<Templates>,
    static_files: Option<StaticFiles>,
    static_prefix: String,
}

impl Default for Api {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl Api {
    /// Application with default configuration (`templates/`, no static assets).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    #[must_use]
    pub fn with_config(config: AppConfig) -> Self {
        let static_prefix = config.normalized_static_prefix();
        let static_files = config.static_dir.clone().map(StaticFiles::new);
        info!(
            templates_dir = %config.templates_dir.display(),
            static_dir = ?config.static_dir,
            static_prefix = %static_prefix,
            "Application created"
        );
        Self {
            templates: Arc::new(Templates::new(config.templates_dir.clone())),
            dispatcher: Dispatcher::new(),
            static_files,
            static_prefix,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        self.dispatcher.router()
    }

    /// Register `handler` under `template`.
    ///
    /// # Errors
    ///
    /// [`RouteError::Duplicate`] if `template` is already registered,
    /// [`RouteError::InvalidTemplate`] if it is malformed.
    pub fn register(&mut self, template: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.dispatcher.register(template, handler)?;
        Ok(self)
    }

    /// Alias of [`Api::register`].
    ///
    /// # Errors
    ///
    /// See [`Api::register`].
    pub fn add_route(&mut self, template: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(template, handler)
    }

    /// Register a function handler.
    ///
    /// # Errors
    ///
    /// See [`Api::register`].
    pub fn route<F>(&mut self, template: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&Request, &mut Response, &Params) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(template, Handler::function(handler))
    }

    /// Register a resource. The instance is shared by every request to `template`.
    ///
    /// # Errors
    ///
    /// See [`Api::register`].
    pub fn resource<R: Resource>(&mut self, template: &str, resource: R) -> Result<&mut Self, RouteError> {
        self.register(template, Handler::resource(resource))
    }

    /// Install the exception hook; a later call replaces it.
    pub fn set_exception_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response, &HandlerError) + Send + Sync + 'static,
    {
        self.dispatcher.set_exception_hook(hook);
        self
    }

    /// Alias of [`Api::set_exception_hook`].
    pub fn add_exception_handler<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response, &HandlerError) + Send + Sync + 'static,
    {
        self.set_exception_hook(hook)
    }

    /// Shared handle to the template environment, for handlers that render pages.
    #[must_use]
    pub fn templates(&self) -> Arc<Templates> {
        Arc::clone(&self.templates)
    }

    /// Render a template from the configured templates directory.
    ///
    /// # Errors
    ///
    /// See [`Templates::render`].
    pub fn template<S: Serialize>(&self, name: &str, context: S) -> Result<String, TemplateError> {
        self.templates.render(name, context)
    }

    /// Dispatch one request. See [`Dispatcher::handle`].
    ///
    /// # Errors
    ///
    /// Unsupported resource methods and unhooked handler failures.
    pub fn handle(
        &self,
        method: &Method,
        path: &str,
        req: &Request,
        resp: &mut Response,
    ) -> Result<(), DispatchError> {
        self.dispatcher.handle(method, path, req, resp)
    }

    /// Produce the full response for `req`: static assets under the static prefix, everything
    /// else through the dispatcher.
    ///
    /// # Errors
    ///
    /// Propagates [`DispatchError`] from [`Api::handle`].
    pub fn respond(&self, req: &Request) -> Result<Response, DispatchError> {
        if let Some(resp) = self.serve_static(req) {
            return Ok(resp);
        }
        let mut resp = Response::new();
        self.handle(&req.method, &req.path, req, &mut resp)?;
        Ok(resp)
    }

    fn static_relative<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.static_prefix.as_str())?;
        if rest.is_empty() {
            return Some("");
        }
        rest.strip_prefix('/')
    }

    fn serve_static(&self, req: &Request) -> Option<Response> {
        let static_files = self.static_files.as_ref()?;
        if req.method != Method::GET && req.method != Method::HEAD {
            return None;
        }
        let relative = self.static_relative(&req.path)?;

        let mut resp = Response::new();
        match static_files.load(relative) {
            Ok((bytes, content_type)) => {
                debug!(path = %req.path, content_type = %content_type, bytes = bytes.len(), "Static file served");
                resp.body(bytes).content_type(content_type);
            }
            Err(e) => {
                debug!(path = %req.path, error = %e, "Static file not found");
                default_handler(req, &mut resp);
            }
        }
        Some(resp)
    }

    /// In-process client for tests.
    #[must_use]
    pub fn test_session(&self) -> TestClient<'_> {
        TestClient::new(self)
    }
}
