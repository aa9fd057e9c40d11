//! User handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /users/create
pub async fn create_user(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let user = state.user_service.create_user().await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}
