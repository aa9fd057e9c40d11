//! Route definitions for the FileStash HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.server.max_request_body_bytes).unwrap_or(usize::MAX);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(health_routes())
        .merge(user_routes())
        .merge(file_routes())
        .merge(link_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::logging::make_request_span))
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// User creation
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/create", post(handlers::user::create_user))
}

/// Upload, listing, and owner downloads
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload", post(handlers::file::upload_files))
        .route("/files/list/{user_id}", get(handlers::file::list_files))
        .route("/files/{file_id}/download", get(handlers::file::download_file))
        .route("/groups/list/{user_id}", get(handlers::file::list_groups))
        .route("/groups/{group_id}/files", get(handlers::file::list_group_files))
        .route("/groups/{group_id}/download", get(handlers::file::download_group))
}

/// Single-use temporary links
fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/temp/create/file/{file_id}", post(handlers::link::create_file_link))
        .route("/temp/create/files/{group_id}", post(handlers::link::create_group_link))
        .route("/temp/download/file/{token}", get(handlers::link::redeem_file_link))
        .route("/temp/download/files/{token}", get(handlers::link::redeem_group_link))
}
