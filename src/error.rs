//! Unified error types.
//!
//! Two families live here and they never mix:
//!
//! - [`Error`] is for things that go wrong *around* request handling: a
//!   malformed route pattern at startup, a bad bind address, an unreadable
//!   config file, a failed `accept`. These are returned to the caller of
//!   [`Router::try_route`](crate::Router::try_route), [`Server`](crate::Server)
//!   or [`Config`](crate::Config).
//! - [`RouteError`] and [`Fault`] are per-request outcomes. They are always
//!   turned into a [`Response`] before leaving the router.

use std::fmt;

use serde::Serialize;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Message used when a fault carries no usable text.
pub(crate) const UNKNOWN_FAULT: &str = "An unknown error occurred";

/// The error type returned by waypost's fallible setup operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A route pattern did not start with `/`.
    #[error("Route path must start with '/': `{path}`")]
    PathFormat { path: String },

    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read config `{path}`: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

// ── Request-time errors ───────────────────────────────────────────────────────

/// Outcomes the router produces on its own, without a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The method string is not one of the six recognized verbs.
    InvalidMethod(String),
    /// No route matches the method and path.
    NotFound { method: String, path: String },
}

impl RouteError {
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidMethod(_) => Status::BadRequest,
            Self::NotFound { .. } => Status::NotFound,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMethod(method) => write!(f, "Invalid HTTP method: {method}"),
            Self::NotFound { method, path } => write!(f, "Cannot {method} {path}"),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}

// ── Fault ─────────────────────────────────────────────────────────────────────

/// A failure raised inside a handler or a middleware.
///
/// Any `std::error::Error` converts into a `Fault` with `?`, keeping its
/// `Display` text as the message. The message is sent to the client in the
/// 500 body, so do not put secrets in it.
///
/// ```rust
/// use waypost::{Fault, Request, Response, RouteParams};
///
/// async fn parse_id(_req: Request, params: RouteParams) -> Result<Response, Fault> {
///     let id: u64 = params["id"].parse()?;
///     Ok(Response::text(id.to_string()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    message: Option<String>,
}

impl Fault {
    /// A fault with an explicit message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()) }
    }

    /// A fault with no usable message; rendered with the generic text.
    pub fn opaque() -> Self {
        Self { message: None }
    }

    /// Builds a fault from a caught panic payload.
    ///
    /// `panic!("...")` payloads are `&'static str` or `String`; anything else
    /// (e.g. `std::panic::panic_any(42)`) has no message.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        if let Some(s) = payload.downcast_ref::<&'static str>() {
            Self::msg(*s)
        } else if let Ok(s) = payload.downcast::<String>() {
            Self::msg(*s)
        } else {
            Self::opaque()
        }
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(UNKNOWN_FAULT)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl<E: std::error::Error> From<E> for Fault {
    fn from(e: E) -> Self {
        Self::msg(e.to_string())
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        error_response(Status::InternalServerError, self.message())
    }
}

// ── JSON body ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

/// Uniform `{"error": …, "message": …}` body. `error` is the reason phrase.
pub(crate) fn error_response(status: Status, message: &str) -> Response {
    let body = ErrorBody { error: status.reason(), message };
    Response::json_value(status, &body)
}
