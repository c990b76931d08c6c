//! CORS allow-list middleware.
//!
//! | Request | Outcome |
//! |---|---|
//! | no `Origin` header | continue (not a CORS request) |
//! | origin not allowed | `403 Origin not allowed` |
//! | allowed, `OPTIONS` | `204` preflight with the allow-* headers |
//! | allowed, other method | continue |
//!
//! The middleware is only reachable through
//! [`Router::cors`](crate::Router::cors), which also points the router's
//! `Origin` echo at the same allow-list. A rejected origin is never echoed.

use futures_util::future::{self, BoxFuture};
use serde::Deserialize;

use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

use super::{Middleware, Outcome};

const DEFAULT_MAX_AGE: u64 = 86_400;

/// CORS settings, usually read from the `[cors]` config section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CorsOptions {
    /// Allowed origins. `"*"` allows any origin.
    pub allow_origin: Vec<String>,
    pub allow_methods: Vec<Method>,
    pub allow_headers: Vec<String>,
    /// Preflight cache lifetime in seconds. Defaults to one day.
    pub max_age: Option<u64>,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            allow_origin: Vec::new(),
            allow_methods: Method::ALL.to_vec(),
            allow_headers: vec!["content-type".to_owned()],
            max_age: None,
        }
    }
}

impl CorsOptions {
    pub fn allows(&self, origin: &str) -> bool {
        self.allow_origin.iter().any(|o| o == "*" || o == origin)
    }
}

/// The CORS middleware.
#[derive(Clone, Debug)]
pub(crate) struct Cors {
    options: CorsOptions,
    allow_methods: String,
    allow_headers: String,
}

impl Cors {
    pub(crate) fn new(options: CorsOptions) -> Self {
        let allow_methods = options.allow_methods.iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let allow_headers = options.allow_headers.join(", ");
        Self { options, allow_methods, allow_headers }
    }

    fn decide(&self, req: &Request) -> Option<Response> {
        let origin = req.origin()?;

        if !self.options.allows(origin) {
            tracing::debug!(origin, "origin rejected");
            return Some(Response::builder().status(Status::Forbidden).text("Origin not allowed"));
        }

        if req.method() != Method::Options.as_str() {
            return None;
        }

        let max_age = self.options.max_age.unwrap_or(DEFAULT_MAX_AGE).to_string();
        Some(
            Response::builder()
                .status(Status::NoContent)
                .header("Access-Control-Allow-Origin", origin)
                .header("Access-Control-Allow-Methods", &self.allow_methods)
                .header("Access-Control-Allow-Headers", &self.allow_headers)
                .header("Access-Control-Max-Age", &max_age)
                .no_body(),
        )
    }
}

impl Middleware for Cors {
    fn call<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Outcome> {
        Box::pin(future::ready(Ok(self.decide(req))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cors(origins: &[&str]) -> Cors {
        Cors::new(CorsOptions {
            allow_origin: origins.iter().map(|s| s.to_string()).collect(),
            allow_methods: vec![Method::Get, Method::Post],
            allow_headers: vec!["content-type".into(), "authorization".into()],
            max_age: None,
        })
    }

    #[test]
    fn no_origin_continues() {
        assert!(cors(&[]).decide(&Request::new("GET", "/")).is_none());
    }

    #[test]
    fn unknown_origin_is_forbidden() {
        let res = cors(&["http://a.test"])
            .decide(&Request::new("GET", "/").with_header("Origin", "http://evil.test"))
            .unwrap();
        assert_eq!(res.status_code(), 403);
        assert_eq!(res.body(), b"Origin not allowed");
    }

    #[test]
    fn allowed_simple_request_continues() {
        let req = Request::new("POST", "/").with_header("Origin", "http://a.test");
        assert!(cors(&["http://a.test"]).decide(&req).is_none());
    }

    #[test]
    fn preflight_gets_allow_headers() {
        let req = Request::new("OPTIONS", "/recipes").with_header("Origin", "http://a.test");
        let res = cors(&["*"]).decide(&req).unwrap();

        assert_eq!(res.status_code(), 204);
        assert_eq!(res.header("access-control-allow-origin"), Some("http://a.test"));
        assert_eq!(res.header("access-control-allow-methods"), Some("GET, POST"));
        assert_eq!(res.header("access-control-allow-headers"), Some("content-type, authorization"));
        assert_eq!(res.header("access-control-max-age"), Some("86400"));
    }
}
