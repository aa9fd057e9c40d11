//! # filestash-api
//!
//! HTTP API layer for FileStash built on Axum.
//!
//! Provides the user, file, and temporary link endpoints, request logging
//! and CORS middleware, DTOs, and the mapping from `AppError` to HTTP
//! responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Backends, build_app, build_state, run_server};
pub use state::AppState;
