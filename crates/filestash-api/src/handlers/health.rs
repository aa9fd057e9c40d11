//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match &state.db_pool {
        Some(pool) => Some(match pool.health_check().await {
            Ok(true) => "connected".to_string(),
            _ => "unreachable".to_string(),
        }),
        None => None,
    };
    let status = match database.as_deref() {
        Some("unreachable") => "degraded",
        _ => "ok",
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.link_store.backend_name().to_string(),
        database,
    }))
}
