use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use serde::Serialize;
use tracing::warn;

/// Content type used when a handler sets a raw body without overriding it.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Header lines a may_minihttp response can hold, `Content-Type` included.
pub const MAX_HEADER_LINES: usize = 16;

/// Upper bound on distinct header lines kept for the lifetime of the process.
const MAX_INTERNED_LINES: usize = 4096;

static INTERNED_LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

/// A response under construction. Handlers mutate it in place; the transport writes it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code (defaults to 200)
    pub status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    content_type: Option<Cow<'static, str>>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
            content_type: None,
        }
    }

    pub fn set_status(&mut self, status: u16) -> &mut Self {
        self.status = status;
        self
    }

    /// Plain-text body (`text/plain`).
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.body = text.into().into_bytes();
        self.content_type = Some(Cow::Borrowed("text/plain"));
        self
    }

    /// JSON body (`application/json`).
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized; the response is left unchanged.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        self.body = bytes;
        self.content_type = Some(Cow::Borrowed("application/json"));
        Ok(self)
    }

    /// Pre-rendered HTML body (`text/html`).
    pub fn html(&mut self, markup: impl Into<String>) -> &mut Self {
        self.body = markup.into().into_bytes();
        self.content_type = Some(Cow::Borrowed("text/html"));
        self
    }

    /// Raw body. The content type is left as is; set it with [`Response::content_type`].
    pub fn body(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.body = bytes.into();
        self
    }

    /// Override the content type.
    pub fn content_type(&mut self, content_type: impl Into<Cow<'static, str>>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Add or replace a header (case-insensitive). `Content-Type` is routed to
    /// [`Response::content_type`].
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        if name.eq_ignore_ascii_case("content-type") {
            let value: String = value.into();
            return self.content_type(value);
        }
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("content-type") {
            return Some(self.get_content_type());
        }
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Headers other than `Content-Type`, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Effective content type.
    #[must_use]
    pub fn get_content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, if it is valid UTF-8.
    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Reason phrase for a status code. Codes without a canonical phrase get an empty one.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// Return a `'static` copy of `line`, allocating once per distinct line.
///
/// `None` once [`MAX_INTERNED_LINES`] distinct lines are held.
fn intern_line(line: String) -> Option<&'static str> {
    let lines = INTERNED_LINES.get_or_init(|| Mutex::new(HashSet::new()));
    let mut lines = match lines.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(existing) = lines.get(line.as_str()) {
        return Some(*existing);
    }
    if lines.len() >= MAX_INTERNED_LINES {
        return None;
    }
    let interned: &'static str = Box::leak(line.into_boxed_str());
    lines.insert(interned);
    Some(interned)
}

fn content_type_line(content_type: &str) -> &'static str {
    match content_type {
        "text/plain" => "Content-Type: text/plain",
        "text/html" => "Content-Type: text/html",
        "text/css" => "Content-Type: text/css",
        "application/json" => "Content-Type: application/json",
        "application/javascript" => "Content-Type: application/javascript",
        "application/octet-stream" => "Content-Type: application/octet-stream",
        "application/wasm" => "Content-Type: application/wasm",
        "image/svg+xml" => "Content-Type: image/svg+xml",
        "image/png" => "Content-Type: image/png",
        "image/jpeg" => "Content-Type: image/jpeg",
        "image/gif" => "Content-Type: image/gif",
        "image/x-icon" => "Content-Type: image/x-icon",
        other => intern_line(format!("Content-Type: {other}")).unwrap_or_else(|| {
            warn!(content_type = %other, "Header line cache full - sending octet-stream");
            "Content-Type: application/octet-stream"
        }),
    }
}

/// Write a [`Response`] to the may_minihttp response.
///
/// may_minihttp holds at most [`MAX_HEADER_LINES`] `&'static str` header lines. Known content
/// types map onto static strings, other lines are interned; headers past the limit are dropped
/// with a warning.
pub fn write_response(res: &mut may_minihttp::Response, resp: Response) {
    res.status_code(resp.status as usize, status_reason(resp.status));
    res.header(content_type_line(resp.get_content_type()));

    let mut written = 1;
    for (name, value) in resp.headers() {
        if written >= MAX_HEADER_LINES {
            warn!(header = %name, limit = MAX_HEADER_LINES, "Header limit reached - dropping header");
            continue;
        }
        match intern_line(format!("{name}: {value}")) {
            Some(line) => {
                res.header(line);
                written += 1;
            }
            None => warn!(header = %name, "Header line cache full - dropping header"),
        }
    }
    res.body_vec(resp.into_body());
}

/// Write the generic 500 used for failures that escaped the dispatcher.
pub fn write_server_error(res: &mut may_minihttp::Response) {
    res.status_code(500, "Internal Server Error");
    res.header("Content-Type: text/plain");
    res.body("Internal Server Error");
}
