//! In-process test client.
//!
//! Drives an [`Api`] without sockets: requests go through the same static-file check and
//! dispatcher as the HTTP transport, and dispatch failures come back as `Err` instead of a 500
//! so tests can assert on them.

use http::Method;
use serde::de::DeserializeOwned;

use crate::app::Api;
use crate::error::DispatchError;
use crate::server::{Request, Response};

/// Strip `scheme://host` from absolute URLs so `http://testserver/hey` and `/hey` are the same
/// request.
fn request_target(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.has_host() => match parsed.query() {
            Some(q) => format!("{}?{}", parsed.path(), q),
            None => parsed.path().to_string(),
        },
        _ => url.to_string(),
    }
}

pub struct TestClient<'a> {
    api: &'a Api,
}

impl<'a> TestClient<'a> {
    #[must_use]
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Send a prepared request.
    ///
    /// # Errors
    ///
    /// Whatever [`Api::respond`] propagates.
    pub fn send(&self, req: Request) -> Result<TestResponse, DispatchError> {
        self.api.respond(&req).map(TestResponse)
    }

    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub fn request(&self, method: Method, url: &str) -> Result<TestResponse, DispatchError> {
        self.send(Request::new(method, &request_target(url)))
    }

    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub fn get(&self, url: &str) -> Result<TestResponse, DispatchError> {
        self.request(Method::GET, url)
    }

    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub fn post(&self, url: &str) -> Result<TestResponse, DispatchError> {
        self.request(Method::POST, url)
    }

    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub fn post_body(&self, url: &str, body: impl Into<Vec<u8>>) -> Result<TestResponse, DispatchError> {
        self.send(Request::new(Method::POST, &request_target(url)).with_body(body))
    }

    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub fn put(&self, url: &str) -> Result<TestResponse, DispatchError> {
        self.request(Method::PUT, url)
    }

    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub fn delete(&self, url: &str) -> Result<TestResponse, DispatchError> {
        self.request(Method::DELETE, url)
    }
}

/// Response returned by [`TestClient`].
#[derive(Debug, Clone)]
pub struct TestResponse(pub Response);

impl TestResponse {
    #[must_use]
    pub fn status(&self) -> u16 {
        self.0.status
    }

    /// Body as text (lossy UTF-8).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.0.body_bytes()).into_owned()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.0.body_bytes()
    }

    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.0.body_bytes())
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.0.get_header(name)
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        self.0.get_content_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_target() {
        assert_eq!(request_target("http://testserver/hey"), "/hey");
        assert_eq!(request_target("http://testserver/a?b=c"), "/a?b=c");
        assert_eq!(request_target("http://testserver"), "/");
        assert_eq!(request_target("/plain"), "/plain");
    }
}
