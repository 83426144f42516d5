//! HTTP transport: request/response types and the may_minihttp service.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query_params, parse_request, Request};
pub use response::{status_reason, write_response, Response, DEFAULT_CONTENT_TYPE};
pub use service::AppService;
