//! Built-in health-check handlers.
//!
//! | Handler | Typical path | Body |
//! |---|---|---|
//! | [`welcome`] | `/` | `{"message":"Welcome"}` |
//! | [`liveness`] | `/health` | `{"status":"ok","timestamp":<unix seconds>}` |
//! | [`readiness`] | `/ready` | `{"status":"ready"}` |
//!
//! ```rust,no_run
//! use waypost::{Router, health};
//!
//! let app = Router::new()
//!     .get("/",       health::welcome)
//!     .get("/health", health::liveness)
//!     .get("/ready",  health::readiness);
//! ```
//!
//! Write your own `readiness` if the service must wait for its dependencies.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use crate::{Request, Response, RouteParams, Status};

pub async fn welcome(_req: Request, _params: RouteParams) -> Response {
    Response::json_value(Status::Ok, &json!({ "message": "Welcome" }))
}

/// Liveness check. Always `200`: if the process can answer, it is alive.
///
/// `timestamp` is the server clock in whole seconds since the Unix epoch.
pub async fn liveness(_req: Request, _params: RouteParams) -> Response {
    Response::json_value(Status::Ok, &json!({ "status": "ok", "timestamp": unix_now() }))
}

pub async fn readiness(_req: Request, _params: RouteParams) -> Response {
    Response::json_value(Status::Ok, &json!({ "status": "ready" }))
}

// A clock set before 1970 reports 0.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
