//! Error taxonomy for registration, dispatch, templating and configuration.
//!
//! Registration errors ([`RouteError`]) are programming errors detected at startup.
//! Per-request failures surface as [`DispatchError`] from
//! [`Dispatcher::handle`](crate::dispatcher::Dispatcher::handle) and are either recovered by the
//! exception hook or propagated to the transport.

use http::Method;
use thiserror::Error;

/// A route template could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unclosed '{{' at byte {position} in template `{template}`")]
    UnclosedBrace { template: String, position: usize },
    #[error("unexpected '}}' at byte {position} in template `{template}`")]
    StrayClosingBrace { template: String, position: usize },
    #[error("empty capture name in template `{template}`")]
    EmptyCapture { template: String },
    #[error("invalid capture name `{name}` in template `{template}`")]
    InvalidCaptureName { template: String, name: String },
    #[error("capture `{name}` appears more than once in template `{template}`")]
    DuplicateCapture { template: String, name: String },
    #[error("captures `{first}` and `{second}` are adjacent in template `{template}`")]
    AdjacentCaptures {
        template: String,
        first: String,
        second: String,
    },
    #[error("template `{template}` produced an invalid matcher: {reason}")]
    Regex { template: String, reason: String },
}

/// Registration-time failure. Fatal to startup, never recovered per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route `{0}` is already registered")]
    Duplicate(String),
    #[error(transparent)]
    InvalidTemplate(#[from] PatternError),
}

/// A failure raised inside a registered handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Returns the wrapped error when the handler returned one (as opposed to panicking).
    #[must_use]
    pub fn as_failure(&self) -> Option<&anyhow::Error> {
        match self {
            HandlerError::Failed(err) => Some(err),
            HandlerError::Panicked(_) => None,
        }
    }

    /// Attempt to view the underlying failure as a concrete error type.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        self.as_failure().and_then(|err| err.downcast_ref::<E>())
    }
}

/// Per-request failure that escaped the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A resource route matched but the resource has no method for the request verb.
    #[error("resource at `{template}` does not support method {method}")]
    UnsupportedMethod { method: Method, template: String },
    /// The handler failed and no exception hook was registered.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Template lookup or rendering failed.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template `{0}` not found")]
    NotFound(String),
    #[error("failed to render template `{name}`: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },
}
