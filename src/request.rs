//! Incoming HTTP request type.

use bytes::Bytes;

/// An incoming HTTP request.
///
/// The method is kept as the raw wire string: the router, not the transport,
/// decides whether it is one it recognizes. The path never includes the
/// query string.
///
/// ```rust
/// use waypost::Request;
///
/// let req = Request::new("GET", "/recipes/7")
///     .with_header("origin", "http://localhost:3000");
/// assert_eq!(req.header("Origin"), Some("http://localhost:3000"));
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Converts a hyper request whose body has already been collected.
    ///
    /// Header values that are not visible ASCII are dropped.
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        Self {
            method: parts.method.as_str().to_owned(),
            path: parts.uri.path().to_owned(),
            headers,
            body,
        }
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Returns the first value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `Origin` header, if present and non-empty.
    pub fn origin(&self) -> Option<&str> {
        self.header("origin").filter(|o| !o.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_strips_query_and_keeps_raw_method() {
        let (parts, ()) = http::Request::builder()
            .method("FETCH")
            .uri("http://localhost/recipes/1?sort=asc")
            .header("X-Trace", "abc")
            .body(())
            .unwrap()
            .into_parts();

        let req = Request::from_parts(parts, Bytes::from_static(b"{}"));
        assert_eq!(req.method(), "FETCH");
        assert_eq!(req.path(), "/recipes/1");
        assert_eq!(req.header("x-trace"), Some("abc"));
        assert_eq!(req.body(), b"{}");
    }

    #[test]
    fn empty_origin_is_absent() {
        let req = Request::new("GET", "/").with_header("Origin", "");
        assert_eq!(req.origin(), None);
    }
}
