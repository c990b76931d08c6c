//! The route table and the first-match matcher.
//!
//! Routes are kept in a `Vec` in registration order and scanned linearly.
//! That order is the only conflict-resolution rule: when two routes can match
//! the same concrete path, the one registered first always wins, even if the
//! later one is "more specific".
//!
//! ```text
//! GET /users/:id      ← registered first, matches /users/me
//! GET /users/me       ← never reached
//! ```
//!
//! Register literal routes before parameter routes of the same shape.

use std::collections::HashMap;

use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::path::{self, Segment};

/// Parameter name → raw path fragment, for one match.
///
/// Values are exactly the request's text: no percent-decoding, no parsing.
pub type RouteParams = HashMap<String, String>;

/// A registered `(method, pattern, handler)` triple with its compiled segments.
pub struct Route {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) segments: Vec<Segment>,
    pub(crate) handler: BoxedHandler,
}

impl Route {
    pub(crate) fn new(method: Method, path: &str, handler: BoxedHandler) -> Self {
        Self {
            method,
            path: path.to_owned(),
            segments: path::compile(path),
            handler,
        }
    }

    pub fn method(&self) -> Method { self.method }

    /// The pattern exactly as it was registered.
    pub fn path(&self) -> &str { &self.path }

    pub fn segments(&self) -> &[Segment] { &self.segments }

    /// Matches request fragments against this route, binding parameters.
    fn bind(&self, fragments: &[&str]) -> Option<RouteParams> {
        if self.segments.len() != fragments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, frag) in self.segments.iter().zip(fragments) {
            match segment {
                Segment::Param(name) => {
                    params.insert(name.clone(), (*frag).to_owned());
                }
                Segment::Literal(lit) if lit == frag => {}
                Segment::Literal(_) => return None,
            }
        }
        Some(params)
    }
}

/// Ordered, append-only collection of routes.
///
/// Only a [`Router`](crate::Router) builds one; read it through
/// [`Router::routes`](crate::Router::routes).
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub(crate) fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub(crate) fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn len(&self) -> usize { self.routes.len() }

    pub fn is_empty(&self) -> bool { self.routes.is_empty() }

    /// Routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Returns the first route matching `method` and `path`, with its bindings.
    pub fn find(&self, method: Method, path: &str) -> Option<(&Route, RouteParams)> {
        let fragments: Vec<&str> = path::split(path).collect();
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| route.bind(&fragments).map(|params| (route, params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::request::Request;
    use crate::response::Response;

    async fn noop(_req: Request, _params: RouteParams) -> Response {
        Response::text("")
    }

    fn table(routes: &[(Method, &str)]) -> RouteTable {
        let mut t = RouteTable::new();
        for (m, p) in routes {
            t.push(Route::new(*m, p, noop.into_boxed_handler()));
        }
        t
    }

    #[test]
    fn binds_single_parameter() {
        let t = table(&[(Method::Get, "/users/:id")]);
        let (route, params) = t.find(Method::Get, "/users/42").unwrap();
        assert_eq!(route.path(), "/users/:id");
        assert_eq!(params.len(), 1);
        assert_eq!(params["id"], "42");
    }

    #[test]
    fn binds_raw_fragment_text() {
        let t = table(&[(Method::Get, "/files/:name")]);
        let (_, params) = t.find(Method::Get, "/files/a%20b.txt").unwrap();
        assert_eq!(params["name"], "a%20b.txt");
    }

    #[test]
    fn literal_mismatch_fails() {
        let t = table(&[(Method::Get, "/users/:id/profile")]);
        assert!(t.find(Method::Get, "/users/42/settings").is_none());
        assert!(t.find(Method::Get, "/Users/42/profile").is_none());
    }

    #[test]
    fn segment_count_must_be_equal() {
        let t = table(&[(Method::Get, "/users/:id")]);
        assert!(t.find(Method::Get, "/users").is_none());
        assert!(t.find(Method::Get, "/users/42/extra").is_none());
    }

    #[test]
    fn method_must_match() {
        let t = table(&[(Method::Post, "/users")]);
        assert!(t.find(Method::Get, "/users").is_none());
        assert!(t.find(Method::Post, "/users").is_some());
    }

    #[test]
    fn first_registered_wins() {
        let t = table(&[(Method::Get, "/users/:id"), (Method::Get, "/users/me")]);
        let (route, params) = t.find(Method::Get, "/users/me").unwrap();
        assert_eq!(route.path(), "/users/:id");
        assert_eq!(params["id"], "me");
    }

    #[test]
    fn duplicate_registration_keeps_both_routes() {
        let t = table(&[(Method::Get, "/a"), (Method::Get, "/a/")]);
        assert_eq!(t.len(), 2);
        let (route, _) = t.find(Method::Get, "/a").unwrap();
        assert_eq!(route.path(), "/a");
    }

    #[test]
    fn request_slashes_are_normalized() {
        let t = table(&[(Method::Get, "/a/b")]);
        for p in ["/a/b", "/a/b/", "//a/b", "/a//b"] {
            assert!(t.find(Method::Get, p).is_some(), "path {p:?}");
        }
    }

    #[test]
    fn root_route_matches_root() {
        let t = table(&[(Method::Get, "/")]);
        assert!(t.find(Method::Get, "/").is_some());
        assert!(t.find(Method::Get, "/x").is_none());
    }
}
