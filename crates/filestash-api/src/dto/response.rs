//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filestash_entity::file::{File, FileGroup};
use filestash_entity::link::{LinkTargetKind, TemporaryLink};
use filestash_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Whether the same request may succeed if retried.
    pub retryable: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Persistence backend name.
    pub backend: String,
    /// Database reachability; absent with the in-memory backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// User summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_uuid(),
            created_at: user.created_at,
        }
    }
}

/// File metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    /// File ID.
    pub id: Uuid,
    /// Group the file was uploaded in.
    pub group_id: Uuid,
    /// Original filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<File> for FileResponse {
    fn from(file: File) -> Self {
        Self {
            id: file.id.into_uuid(),
            group_id: file.file_group_id.into_uuid(),
            filename: file.original_filename,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            created_at: file.created_at,
        }
    }
}

/// File group summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    /// Group ID.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<FileGroup> for GroupResponse {
    fn from(group: FileGroup) -> Self {
        Self {
            id: group.id.into_uuid(),
            user_id: group.user_id.into_uuid(),
            created_at: group.created_at,
        }
    }
}

/// Result of an upload: the new group and its files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// The group created for this upload.
    pub group_id: Uuid,
    /// Stored files in upload order.
    pub files: Vec<FileResponse>,
}

/// A freshly issued temporary link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    /// Absolute single-use download URL.
    pub url: String,
    /// What the link points at.
    pub kind: LinkTargetKind,
    /// ID of the file or group.
    pub target_id: Uuid,
    /// Expiry, when a link TTL is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl LinkResponse {
    /// Builds the response for `link`, served under `base_url`.
    pub fn new(link: &TemporaryLink, base_url: &str) -> Self {
        let route = match link.target.kind() {
            LinkTargetKind::File => "file",
            LinkTargetKind::Group => "files",
        };
        Self {
            url: format!("{base_url}/temp/download/{route}/{}", link.id),
            kind: link.target.kind(),
            target_id: link.target.resource_id(),
            expires_at: link.expires_at,
        }
    }
}
