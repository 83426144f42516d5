use std::collections::HashMap;
use std::io::Read;

use http::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::ids::RequestId;

/// An inbound HTTP request as seen by handlers.
///
/// Built by the transport ([`parse_request`]) or directly in tests via [`Request::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Parsed query string parameters
    pub query_params: HashMap<String, String>,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed cookies from the Cookie header
    pub cookies: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Create a request for `method` and `target`. A query string in `target` is split off and
    /// parsed.
    pub fn new(method: Method, target: &str) -> Self {
        let path = target.split('?').next().unwrap_or("/").to_string();
        Self {
            request_id: RequestId::new(),
            method,
            path,
            query_params: parse_query_params(target),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Add a header. Names are stored lowercase; a `Cookie` header also fills [`Request::cookies`].
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        self.headers.insert(name, value.to_string());
        self.cookies = parse_cookies(&self.headers);
        if let Some(id) = self.headers.get("x-request-id") {
            self.request_id = RequestId::from_header_or_new(Some(id));
        }
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Body decoded as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// Body deserialized from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Parse the Cookie header into name/value pairs.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    if name.is_empty() {
                        return None;
                    }
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse query string parameters from a request target.
///
/// Extracts everything after the `?` character and URL-decodes names and values.
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    if let Some(pos) = target.find('?') {
        let query_str = &target[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Convert a `may_minihttp::Request` into a [`Request`].
///
/// Unknown methods become extension methods; bytes that are not a valid method token fall back
/// to GET.
pub fn parse_request(req: may_minihttp::Request) -> Request {
    let method = Method::from_bytes(req.method().as_bytes()).unwrap_or(Method::GET);
    let raw_path = req.path().to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    debug!(
        header_count = headers.len(),
        header_names = ?headers.keys().take(20).collect::<Vec<_>>(),
        "Headers extracted"
    );

    let mut body = Vec::new();
    if let Err(e) = req.body().read_to_end(&mut body) {
        debug!(error = %e, "Request body read failed");
        body.clear();
    }

    let request_id = RequestId::from_header_or_new(headers.get("x-request-id").map(String::as_str));
    let cookies = parse_cookies(&headers);
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        headers_count = headers.len(),
        body_size_bytes = body.len(),
        "HTTP request parsed"
    );

    Request {
        request_id,
        method,
        path,
        query_params: parse_query_params(&raw_path),
        headers,
        cookies,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookies() {
        let mut h = HashMap::new();
        h.insert("cookie".to_string(), "a=b; c=d".to_string());
        let cookies = parse_cookies(&h);
        assert_eq!(cookies.get("a"), Some(&"b".to_string()));
        assert_eq!(cookies.get("c"), Some(&"d".to_string()));
    }

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/p?x=1&y=hello%20world");
        assert_eq!(q.get("x"), Some(&"1".to_string()));
        assert_eq!(q.get("y"), Some(&"hello world".to_string()));
    }

    #[test]
    fn test_new_splits_query() {
        let req = Request::new(Method::GET, "/search?q=rust");
        assert_eq!(req.path, "/search");
        assert_eq!(req.get_query_param("q"), Some("rust"));
    }

    #[test]
    fn test_headers_case_insensitive() {
        let req = Request::new(Method::POST, "/").with_header("Content-Type", "application/json");
        assert_eq!(req.get_header("content-type"), Some("application/json"));
        assert_eq!(req.get_header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_json_body() {
        let req = Request::new(Method::POST, "/").with_body(r#"{"name":"bumbo"}"#);
        let v: serde_json::Value = req.json().unwrap();
        assert_eq!(v["name"], "bumbo");
        assert_eq!(req.text().unwrap(), r#"{"name":"bumbo"}"#);
    }
}
