//! Route table
//!
//! Several actions answer on short aliases (`/d`, `/mk`, `/md`, `/mv`).

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::protocol::handlers;
use crate::server::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size_bytes();

    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .route("/hide/{*path}", get(handlers::hide))
        .route("/unhide/{*path}", get(handlers::unhide))
        .route("/unhide-all", get(handlers::unhide_all))
        .route("/show-hides", get(handlers::show_hides))
        .route("/ignore/{*pattern}", get(handlers::ignore))
        .route("/unignore/{*pattern}", get(handlers::unignore))
        .route("/show-ignored", get(handlers::show_ignored))
        .route("/delete/{*path}", get(handlers::delete))
        .route("/d/{*path}", get(handlers::delete))
        .route("/mkdir/{*path}", get(handlers::mkdir))
        .route("/mk/{*path}", get(handlers::mkdir))
        .route("/md/{*path}", get(handlers::mkdir))
        .route("/move", get(handlers::move_path))
        .route("/mv", get(handlers::move_path))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
