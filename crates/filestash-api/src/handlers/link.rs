//! Temporary link issuance and redemption handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;

use filestash_core::types::{FileGroupId, FileId};
use filestash_entity::link::LinkId;

use crate::dto::request::OwnerQuery;
use crate::dto::response::{ApiResponse, LinkResponse};
use crate::error::ApiError;
use crate::handlers::attachment;
use crate::state::AppState;

/// POST /temp/create/file/{fileId}?user_id=
pub async fn create_file_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<FileId>,
    Query(query): Query<OwnerQuery>,
) -> Result<(StatusCode, Json<ApiResponse<LinkResponse>>), ApiError> {
    let link = state
        .link_service
        .issue_for_file(file_id, query.caller()?)
        .await?;
    let body = LinkResponse::new(&link, &base_url(&state, &headers));
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(body))))
}

/// POST /temp/create/files/{groupId}?user_id=
pub async fn create_group_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<FileGroupId>,
    Query(query): Query<OwnerQuery>,
) -> Result<(StatusCode, Json<ApiResponse<LinkResponse>>), ApiError> {
    let link = state
        .link_service
        .issue_for_group(group_id, query.caller()?)
        .await?;
    let body = LinkResponse::new(&link, &base_url(&state, &headers));
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(body))))
}

/// GET /temp/download/file/{token}
pub async fn redeem_file_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let result = state.link_service.redeem_file(&LinkId::new(token)).await?;
    Ok(attachment(result)?)
}

/// GET /temp/download/files/{token}
pub async fn redeem_group_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let result = state.link_service.redeem_group(&LinkId::new(token)).await?;
    Ok(attachment(result)?)
}

/// Scheme and authority links are served under, without a trailing slash.
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.config.server.public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}:{}", state.config.server.host, state.config.server.port));

    format!("{proto}://{host}")
}
