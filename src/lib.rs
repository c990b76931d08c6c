//! # waypost
//!
//! A minimal HTTP router: an ordered route table with `:param` segments, a
//! short-circuiting middleware chain, and one rule for failures: every
//! request ends in a response.
//!
//! ## The contract
//!
//! - **Registration order is precedence.** The first route whose method and
//!   segments match wins. There is no "most specific" ranking.
//! - **Segments are exact.** `/recipes/:id` matches `/recipes/7` and nothing
//!   with more or fewer segments. Empty fragments are ignored, so
//!   `/recipes/7/` and `//recipes/7` are the same path.
//! - **Errors have one shape.** The router's own 400, 404 and 500 responses
//!   are `{"error": <reason>, "message": <text>}` JSON.
//! - **Handlers cannot crash the server.** An `Err` return or a panic becomes
//!   a `500` carrying the fault message.
//!
//! No wildcards, no regex segments, no query parsing, no timeouts. The proxy
//! in front and the transport underneath own those.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use waypost::{Fault, Request, Response, RouteParams, Router, Server, Status};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), waypost::Error> {
//!     let app = Router::new()
//!         .get("/recipes/:id", get_recipe)
//!         .post("/recipes",    create_recipe);
//!
//!     Server::bind("0.0.0.0:8000")?.serve(app).await
//! }
//!
//! async fn get_recipe(_req: Request, params: RouteParams) -> Result<Response, Fault> {
//!     let id: u64 = params["id"].parse()?;
//!     Ok(Response::json(format!(r#"{{"id":{id}}}"#).into_bytes()))
//! }
//!
//! async fn create_recipe(req: Request, _params: RouteParams) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(Status::BadRequest);
//!     }
//!     Response::builder()
//!         .status(Status::Created)
//!         .header("location", "/recipes/99")
//!         .json(br#"{"id":99}"#.to_vec())
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod health;
pub mod middleware;
pub mod path;
pub mod route;

pub use config::{Config, ServerConfig};
pub use error::{Error, Fault, RouteError};
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use route::RouteParams;
pub use router::{OriginPolicy, Router};
pub use server::Server;
pub use status::Status;
