//! Router Module
//!
//! Maps HTTP requests onto repository operations.
//!
//! ## Route Table
//! ```text
//! ┌────────┬──────────────────┬────────────┬─────────┬─────────────┐
//! │ Method │ Path             │ Operation  │ Success │ Failure     │
//! ├────────┼──────────────────┼────────────┼─────────┼─────────────┤
//! │ GET    │ /squirrels       │ list       │ 200     │             │
//! │ POST   │ /squirrels       │ create     │ 201     │ 400, 413    │
//! │ GET    │ /squirrels/{id}  │ get        │ 200     │ 404         │
//! │ PUT    │ /squirrels/{id}  │ replace    │ 204     │ 400, 404    │
//! │ DELETE │ /squirrels/{id}  │ delete     │ 204     │ 404         │
//! │ other  │ known path       │            │         │ 405 + Allow │
//! │ any    │ unknown path     │            │         │ 404         │
//! └────────┴──────────────────┴────────────┴─────────┴─────────────┘
//! ```
//!
//! Each path is also served with one trailing slash. Repository calls do
//! blocking file I/O, so handlers run them on the blocking pool.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::repository::SquirrelRepository;

/// Collection path
pub const COLLECTION_PATH: &str = "/squirrels";

/// Shared handler state
pub type AppState = Arc<SquirrelRepository>;

/// Build the application router over a repository
pub fn build_router(repo: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/squirrels", collection_routes())
        .route("/squirrels/", collection_routes())
        .route("/squirrels/:id", item_routes())
        .route("/squirrels/:id/", item_routes())
        .fallback(handlers::unknown_path_handler)
        .with_state(repo)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TraceLayer::new_for_http());

    if config.request_timeout_ms > 0 {
        router.layer(TimeoutLayer::new(Duration::from_millis(
            config.request_timeout_ms,
        )))
    } else {
        router
    }
}

/// `/squirrels`
fn collection_routes() -> MethodRouter<AppState> {
    get(handlers::list_handler).post(handlers::create_handler)
}

/// `/squirrels/{id}`
fn item_routes() -> MethodRouter<AppState> {
    get(handlers::get_handler)
        .put(handlers::replace_handler)
        .delete(handlers::delete_handler)
}
