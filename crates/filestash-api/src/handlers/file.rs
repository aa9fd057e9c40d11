//! Upload, listing, and owner download handlers.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;

use filestash_core::error::AppError;
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_service::UploadedFile;

use crate::dto::request::OwnerQuery;
use crate::dto::response::{ApiResponse, FileResponse, GroupResponse, UploadResponse};
use crate::error::ApiError;
use crate::handlers::attachment;
use crate::state::AppState;

/// Multipart field carrying files. Unnamed file parts are accepted too.
const FILE_FIELD: &str = "files";

/// POST /files/upload?user_id=
pub async fn upload_files(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), ApiError> {
    let user_id = query.caller()?;
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let is_file = field.name().is_none_or(|name| name == FILE_FIELD || name == "file")
            || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await.map_err(multipart_error)?;

        uploads.push(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    let (group, files) = state.upload_service.upload(user_id, uploads).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UploadResponse {
            group_id: group.id.into_uuid(),
            files: files.into_iter().map(FileResponse::from).collect(),
        })),
    ))
}

/// GET /files/list/{userId}
pub async fn list_files(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = state.file_service.list_files(user_id).await?;
    Ok(Json(ApiResponse::ok(
        files.into_iter().map(FileResponse::from).collect(),
    )))
}

/// GET /groups/list/{userId}
pub async fn list_groups(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<GroupResponse>>>, ApiError> {
    let groups = state.file_service.list_groups(user_id).await?;
    Ok(Json(ApiResponse::ok(
        groups.into_iter().map(GroupResponse::from).collect(),
    )))
}

/// GET /groups/{groupId}/files?user_id=
pub async fn list_group_files(
    State(state): State<AppState>,
    Path(group_id): Path<FileGroupId>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = state
        .file_service
        .files_in_group(group_id, query.caller()?)
        .await?;
    Ok(Json(ApiResponse::ok(
        files.into_iter().map(FileResponse::from).collect(),
    )))
}

/// GET /files/{fileId}/download?user_id=
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<FileId>,
    Query(query): Query<OwnerQuery>,
) -> Result<Response, ApiError> {
    let result = state
        .download_service
        .download_file(file_id, query.caller()?)
        .await?;
    Ok(attachment(result)?)
}

/// GET /groups/{groupId}/download?user_id=
pub async fn download_group(
    State(state): State<AppState>,
    Path(group_id): Path<FileGroupId>,
    Query(query): Query<OwnerQuery>,
) -> Result<Response, ApiError> {
    let result = state
        .download_service
        .download_group(group_id, query.caller()?)
        .await?;
    Ok(attachment(result)?)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(format!("Upload too large: {}", e.body_text()))
    } else {
        AppError::validation(format!("Multipart error: {}", e.body_text()))
    }
}
