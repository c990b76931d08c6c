//! Minimal waypost service: health checks and a read-only recipe endpoint.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!   WAYPOST_CONFIG=waypost.toml cargo run --example basic
//!
//! Try:
//!   curl http://localhost:8000/recipes/1
//!   curl http://localhost:8000/recipes/abc          # 500, parse error message
//!   curl -X FETCH http://localhost:8000/recipes/1   # 400
//!   curl -H 'Origin: http://localhost:3000' http://localhost:8000/health

use serde::Serialize;
use tracing_subscriber::EnvFilter;
use waypost::{Config, Fault, Request, Response, RouteParams, Router, Server, Status, health};

#[derive(Serialize)]
struct Recipe {
    id: u64,
    title: &'static str,
}

#[tokio::main]
async fn main() -> Result<(), waypost::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("WAYPOST_CONFIG") {
        Ok(path) => Config::load(path)?,
        Err(_) => Config::default(),
    };

    let app = Router::new()
        .get("/",             health::welcome)
        .get("/health",       health::liveness)
        .get("/recipes/:id",  get_recipe)
        .delete("/recipes/:id", delete_recipe);
    let app = config.apply(app);

    Server::from_config(&config.server)?.serve(app).await
}

// GET /recipes/:id
//
// A non-numeric id fails the parse; `?` turns it into a 500 whose message is
// the parse error text.
async fn get_recipe(_req: Request, params: RouteParams) -> Result<Response, Fault> {
    let id: u64 = params["id"].parse()?;
    Ok(Response::json_value(Status::Ok, &Recipe { id, title: "Shakshuka" }))
}

// DELETE /recipes/:id → 204 No Content
async fn delete_recipe(_req: Request, _params: RouteParams) -> Status {
    Status::NoContent
}
