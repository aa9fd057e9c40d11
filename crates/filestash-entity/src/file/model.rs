//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filestash_core::types::{FileGroupId, FileId, UserId};

/// Fallback content type for uploads that do not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata for one stored file. The bytes live in the storage provider
/// under [`File::storage_path`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The group this file was uploaded in.
    pub file_group_id: FileGroupId,
    /// File name as supplied by the uploader.
    pub original_filename: String,
    /// MIME type declared at upload.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-disable flag.
    pub is_active: bool,
}

impl File {
    /// Storage key for this file's bytes: `{user_id}/{group_id}/{file_id}`.
    pub fn storage_path(&self, owner: UserId) -> String {
        format!("{owner}/{}/{}", self.file_group_id, self.id)
    }
}

/// Data required to record a new file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Pre-generated id; the bytes are stored before the row is written.
    pub id: FileId,
    /// Owning group.
    pub file_group_id: FileGroupId,
    /// File name as supplied by the uploader.
    pub original_filename: String,
    /// MIME type.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
}

impl CreateFile {
    /// Materialize the row as the in-memory backend stores it.
    pub fn into_file(self, now: DateTime<Utc>) -> File {
        File {
            id: self.id,
            file_group_id: self.file_group_id,
            original_filename: self.original_filename,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_path_layout() {
        let owner = UserId::new();
        let file = CreateFile {
            id: FileId::new(),
            file_group_id: FileGroupId::new(),
            original_filename: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 12,
        }
        .into_file(Utc::now());

        assert_eq!(
            file.storage_path(owner),
            format!("{owner}/{}/{}", file.file_group_id, file.id)
        );
    }
}
