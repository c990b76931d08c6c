//! Handler trait, type erasure and the panic-catching executor.
//!
//! # How async handlers are stored
//!
//! The route table holds handlers of *different* types in one `Vec<Route>`,
//! so each handler is hidden behind a trait object (`dyn ErasedHandler`):
//!
//! ```text
//! async fn get_recipe(req, params) -> Response { … }   ← user writes this
//!        ↓ router.get("/recipes/:id", get_recipe)
//! get_recipe.into_boxed_handler()                      ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(get_recipe))                      ← stored as BoxedHandler
//!        ↓
//! execute(&handler, req, params)  at request time      ← catch_unwind + one vtable call
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::error::Fault;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::route::RouteParams;

// ── Internal types ────────────────────────────────────────────────────────────

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request, params: RouteParams) -> BoxFuture<'static, Response>;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Automatically satisfied for any `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request, params: RouteParams) -> impl IntoResponse
/// ```
///
/// Return `Result<_, Fault>` (or any `Result<_, E>` where `E: Error`) to turn
/// failures into a `500` carrying the error's message. A panic inside the
/// handler is caught and reported the same way.
///
/// The trait is **sealed**: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, RouteParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request, RouteParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Bridges a concrete handler `F` to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request, RouteParams) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, params: RouteParams) -> BoxFuture<'static, Response> {
        let fut = (self.0)(req, params);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Executor ──────────────────────────────────────────────────────────────────

/// Runs a handler to completion and always yields a response.
///
/// The call itself sits inside the guarded future, so a panic while building
/// the handler's future is caught as well as one raised after an `.await`.
pub(crate) async fn execute(handler: &BoxedHandler, req: Request, params: RouteParams) -> Response {
    let run = async move { handler.call(req, params).await };
    match AssertUnwindSafe(run).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let fault = Fault::from_panic(payload);
            tracing::error!(message = %fault, "handler panicked");
            fault.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    fn json(res: &Response) -> serde_json::Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[tokio::test]
    async fn passes_request_and_params_through() {
        async fn echo(req: Request, params: RouteParams) -> String {
            format!("{} {}", req.path(), params["id"])
        }

        let h = echo.into_boxed_handler();
        let params = RouteParams::from([("id".to_owned(), "7".to_owned())]);
        let res = execute(&h, Request::new("GET", "/r/7"), params).await;
        assert_eq!(res.body(), b"/r/7 7");
    }

    #[tokio::test]
    async fn string_panic_becomes_500_with_message() {
        async fn boom(_: Request, _: RouteParams) -> Response {
            panic!("boom")
        }

        let res = execute(&boom.into_boxed_handler(), Request::new("GET", "/"), RouteParams::new()).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(json(&res)["message"], "boom");
    }

    #[tokio::test]
    async fn formatted_panic_keeps_message() {
        async fn boom(_: Request, _: RouteParams) -> Response {
            let id = 3;
            panic!("recipe {id} missing")
        }

        let res = execute(&boom.into_boxed_handler(), Request::new("GET", "/"), RouteParams::new()).await;
        assert_eq!(json(&res)["message"], "recipe 3 missing");
    }

    #[tokio::test]
    async fn non_string_panic_uses_generic_message() {
        async fn odd(_: Request, _: RouteParams) -> Response {
            std::panic::panic_any(42_u32)
        }

        let res = execute(&odd.into_boxed_handler(), Request::new("GET", "/"), RouteParams::new()).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(json(&res)["error"], "Internal Server Error");
        assert_eq!(json(&res)["message"], "An unknown error occurred");
    }

    #[tokio::test]
    async fn opaque_fault_uses_generic_message() {
        async fn opaque(_: Request, _: RouteParams) -> Result<Status, Fault> {
            Err(Fault::opaque())
        }

        let res = execute(&opaque.into_boxed_handler(), Request::new("GET", "/"), RouteParams::new()).await;
        assert_eq!(json(&res)["message"], "An unknown error occurred");
    }
}
