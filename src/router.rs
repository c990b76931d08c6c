//! The application router.
//!
//! One request goes through the same fixed pipeline every time:
//!
//! ```text
//! middleware chain ──(response)──────────────────────────────┐
//!        │ continue                                          │
//! method check ──(unknown verb)── 400                        │
//!        │                                                   │
//! route table ──(no match)─────── 404                        │
//!        │                                                   │
//! handler ──(fault / panic)────── 500                        │
//!        │                                                   ▼
//!        └──────────────────────────────────────────► origin echo ──► response
//! ```
//!
//! Every path ends in a [`Response`]: [`Router::handle`] cannot fail.

use std::sync::Arc;

use crate::error::{Error, RouteError};
use crate::handler::{self, Handler};
use crate::method::Method;
use crate::middleware::{Chain, Cors, CorsOptions, Middleware};
use crate::path;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::route::{Route, RouteTable};

/// Decides whether the router echoes a request's `Origin` back.
#[derive(Clone, Debug, Default)]
pub enum OriginPolicy {
    /// Echo every origin. Used when no CORS allow-list is installed.
    #[default]
    EchoAny,
    /// Echo only origins the allow-list accepts.
    AllowList(Arc<CorsOptions>),
}

impl OriginPolicy {
    fn echoes(&self, origin: &str) -> bool {
        match self {
            Self::EchoAny => true,
            Self::AllowList(options) => options.allows(origin),
        }
    }
}

/// The application router.
///
/// Build it once at startup, then hand it to [`Server::serve`](crate::Server::serve).
/// Every builder method takes `self`, so the route table and middleware chain
/// cannot change once the router is serving.
///
/// # Matching is first-match, not best-match
///
/// Routes are tried in registration order and the first whose method and
/// segments fit wins. A literal route registered *after* a parameter route of
/// the same shape is never reached:
///
/// ```rust
/// # use waypost::{Request, Response, RouteParams, Router};
/// # async fn by_id(_: Request, _: RouteParams) -> Response { Response::text("") }
/// # async fn me(_: Request, _: RouteParams) -> Response { Response::text("") }
/// Router::new()
///     .get("/users/me",  me)     // register the literal first…
///     .get("/users/:id", by_id); // …or `/users/me` would bind id = "me"
/// ```
///
/// # Origin echo
///
/// When a request has an `Origin` header, the final response gets
/// `Access-Control-Allow-Origin: <origin>` and `Vary: Origin`. With
/// [`Router::cors`] installed only allow-listed origins are echoed.
pub struct Router {
    table: RouteTable,
    chain: Chain,
    origin_policy: OriginPolicy,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            table: RouteTable::new(),
            chain: Chain::new(),
            origin_policy: OriginPolicy::default(),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `:name` syntax and reach the handler through its
    /// `RouteParams` argument.
    ///
    /// # Errors
    ///
    /// [`Error::PathFormat`] if `path` does not start with `/`.
    pub fn try_route(mut self, method: Method, path: &str, handler: impl Handler) -> Result<Self, Error> {
        let path = path::validate(path)?;
        self.table.push(Route::new(method, path, handler.into_boxed_handler()));
        tracing::trace!(%method, path, "route registered");
        Ok(self)
    }

    /// Like [`try_route`](Router::try_route), for chained startup code.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not start with `/`. A malformed pattern is a
    /// programming error and should stop the process before it serves.
    pub fn route(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.try_route(method, path, handler)
            .unwrap_or_else(|e| panic!("invalid route: {e}"))
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::Delete, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::Patch, path, handler)
    }

    pub fn options(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::Options, path, handler)
    }

    /// Appends a middleware. Middlewares run in the order they are added.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.chain.push(middleware);
        self
    }

    /// Appends the CORS middleware and makes its allow-list the single
    /// authority for the origin echo.
    ///
    /// This is the only way to install CORS, so a `403` for a rejected origin
    /// never carries that origin back in `Access-Control-Allow-Origin`.
    pub fn cors(mut self, options: CorsOptions) -> Self {
        self.origin_policy = OriginPolicy::AllowList(Arc::new(options.clone()));
        self.layer(Cors::new(options))
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn origin_policy(&self) -> &OriginPolicy {
        &self.origin_policy
    }

    /// Runs one request through the pipeline.
    pub async fn handle(&self, req: Request) -> Response {
        let origin = req.origin().map(str::to_owned);
        let response = self.dispatch(req).await;
        self.finish(origin.as_deref(), response)
    }

    async fn dispatch(&self, req: Request) -> Response {
        match self.chain.run(&req).await {
            Ok(Some(response)) => return response,
            Ok(None) => {}
            Err(fault) => return fault.into_response(),
        }

        let method: Method = match req.method().parse() {
            Ok(m) => m,
            Err(_) => {
                tracing::debug!(method = req.method(), "rejecting unknown method");
                return RouteError::InvalidMethod(req.method().to_owned()).into_response();
            }
        };

        let Some((route, params)) = self.table.find(method, req.path()) else {
            tracing::debug!(%method, path = req.path(), "no route");
            return RouteError::NotFound {
                method: method.to_string(),
                path: req.path().to_owned(),
            }
            .into_response();
        };

        tracing::debug!(%method, path = req.path(), route = route.path(), "matched");
        handler::execute(&route.handler, req, params).await
    }

    /// Merges the `Origin` echo onto the outgoing response.
    ///
    /// Only the two CORS headers are replaced; everything the handler set
    /// stays as it was.
    fn finish(&self, origin: Option<&str>, mut response: Response) -> Response {
        if let Some(origin) = origin.filter(|o| self.origin_policy.echoes(o)) {
            response.set_header("Access-Control-Allow-Origin", origin);
            response.set_header("Vary", "Origin");
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteParams;

    async fn ok(_req: Request, _params: RouteParams) -> &'static str {
        "ok"
    }

    fn allow(origins: &[&str]) -> CorsOptions {
        CorsOptions {
            allow_origin: origins.iter().map(|s| s.to_string()).collect(),
            ..CorsOptions::default()
        }
    }

    #[test]
    fn new_router_starts_empty_and_echoes_any() {
        let router = Router::new();
        assert!(router.routes().is_empty());
        assert!(matches!(router.origin_policy(), OriginPolicy::EchoAny));
    }

    #[test]
    fn cors_switches_policy_and_adds_one_layer() {
        let router = Router::new().cors(allow(&["http://a.test"]));
        assert_eq!(router.chain.len(), 1);
        assert!(router.origin_policy.echoes("http://a.test"));
        assert!(!router.origin_policy.echoes("http://evil.test"));
    }

    #[tokio::test]
    async fn rejected_origin_is_not_echoed_on_forbidden() {
        let router = Router::new()
            .cors(allow(&["http://a.test"]))
            .get("/", ok);

        let res = router
            .handle(Request::new("GET", "/").with_header("Origin", "http://evil.test"))
            .await;
        assert_eq!(res.status_code(), 403);
        assert_eq!(res.header("access-control-allow-origin"), None);
        assert_eq!(res.header("vary"), None);
    }

    #[tokio::test]
    async fn rejected_preflight_is_not_echoed() {
        let router = Router::new().cors(allow(&["http://a.test"]));

        let res = router
            .handle(Request::new("OPTIONS", "/").with_header("Origin", "http://evil.test"))
            .await;
        assert_eq!(res.status_code(), 403);
        assert_eq!(res.header("access-control-allow-origin"), None);
        assert_eq!(res.header("access-control-allow-methods"), None);
    }
}
