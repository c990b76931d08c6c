//! Middleware layer.
//!
//! A middleware sees the request before routing and answers one of three ways:
//!
//! | Return | Meaning |
//! |---|---|
//! | `Ok(None)` | continue with the next middleware, then routing |
//! | `Ok(Some(response))` | stop here; `response` is sent as-is |
//! | `Err(fault)` | stop here; the client gets `500` with the fault message |
//!
//! Middlewares run strictly in the order they were added with
//! [`Router::layer`](crate::Router::layer). Once one returns a response, no
//! later middleware runs and no route is matched.
//!
//! Plain closures are middleware:
//!
//! ```rust
//! use waypost::middleware::Outcome;
//! use waypost::{Request, Response, Router, Status};
//!
//! let app = Router::new().layer(|req: &Request| -> Outcome {
//!     if req.header("authorization").is_none() {
//!         return Ok(Some(Response::status(Status::Unauthorized)));
//!     }
//!     Ok(None)
//! });
//! ```
//!
//! For middleware that needs to `.await`, implement [`Middleware`] directly.

mod cors;

pub(crate) use cors::Cors;
pub use cors::CorsOptions;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future;

pub use futures_util::future::BoxFuture;

use crate::error::Fault;
use crate::request::Request;
use crate::response::Response;

/// What a middleware decided about a request.
pub type Outcome = Result<Option<Response>, Fault>;

/// A request interceptor that may end handling early.
pub trait Middleware: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Outcome>;
}

impl<F> Middleware for F
where
    F: Fn(&Request) -> Outcome + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Outcome> {
        Box::pin(future::ready(self(req)))
    }
}

/// Ordered list of middlewares.
#[derive(Clone, Default)]
pub struct Chain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, mw: impl Middleware) {
        self.layers.push(Arc::new(mw));
    }

    pub fn len(&self) -> usize { self.layers.len() }

    pub fn is_empty(&self) -> bool { self.layers.is_empty() }

    /// Runs every middleware in order until one ends the request.
    ///
    /// A panicking middleware is reported as a fault, same as `Err`.
    pub async fn run(&self, req: &Request) -> Outcome {
        for (index, mw) in self.layers.iter().enumerate() {
            let step = async { mw.call(req).await };
            let outcome = match AssertUnwindSafe(step).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => Err(Fault::from_panic(payload)),
            };

            match outcome {
                Ok(None) => continue,
                Ok(Some(response)) => {
                    tracing::debug!(index, status = response.status, "middleware short-circuit");
                    return Ok(Some(response));
                }
                Err(fault) => {
                    tracing::error!(index, message = %fault, "middleware fault");
                    return Err(fault);
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::status::Status;

    struct Count(Arc<AtomicUsize>);

    impl Middleware for Count {
        fn call<'a>(&'a self, _req: &'a Request) -> BoxFuture<'a, Outcome> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
        }
    }

    #[tokio::test]
    async fn all_continue_yields_none() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut chain = Chain::new();
        chain.push(Count(hits.clone()));
        chain.push(Count(hits.clone()));

        assert!(chain.run(&Request::new("GET", "/")).await.unwrap().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn first_response_stops_the_chain() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut chain = Chain::new();
        chain.push(|_: &Request| -> Outcome { Ok(Some(Response::status(Status::Forbidden))) });
        chain.push(Count(hits.clone()));

        let res = chain.run(&Request::new("GET", "/")).await.unwrap().unwrap();
        assert_eq!(res.status_code(), 403);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn panic_is_a_fault() {
        let mut chain = Chain::new();
        chain.push(|_: &Request| -> Outcome { panic!("middleware broke") });

        let fault = chain.run(&Request::new("GET", "/")).await.unwrap_err();
        assert_eq!(fault.message(), "middleware broke");
    }
}
