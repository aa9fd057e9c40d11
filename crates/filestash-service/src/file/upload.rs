//! Multi-file uploads into a new file group.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use filestash_core::error::AppError;
use filestash_core::traits::storage::StorageProvider;
use filestash_core::types::{FileId, UserId};
use filestash_database::store::FileCatalog;
use filestash_entity::file::{CreateFile, DEFAULT_CONTENT_TYPE, File, FileGroup};

use super::service::FileService;

/// One file received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename.
    pub filename: String,
    /// Client-supplied MIME type.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// Stores uploads and records their metadata.
#[derive(Debug, Clone)]
pub struct UploadService {
    files: Arc<FileService>,
    catalog: Arc<dyn FileCatalog>,
    storage: Arc<dyn StorageProvider>,
    max_file_size: u64,
}

impl UploadService {
    /// Creates a new upload service. `max_file_size` applies per file.
    pub fn new(
        files: Arc<FileService>,
        catalog: Arc<dyn FileCatalog>,
        storage: Arc<dyn StorageProvider>,
        max_file_size: u64,
    ) -> Self {
        Self {
            files,
            catalog,
            storage,
            max_file_size,
        }
    }

    /// Stores `uploads` for `user_id` as one new group.
    ///
    /// All files are validated before anything is written. Each file's bytes
    /// are stored before its row is recorded; if recording fails the bytes
    /// are removed again.
    pub async fn upload(
        &self,
        user_id: UserId,
        uploads: Vec<UploadedFile>,
    ) -> Result<(FileGroup, Vec<File>), AppError> {
        self.validate(&uploads)?;
        self.files.require_user(user_id).await?;

        let group = self.catalog.create_group(user_id).await?;
        let mut stored = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let file_id = FileId::new();
            let path = format!("{user_id}/{}/{file_id}", group.id);
            let size_bytes = i64::try_from(upload.data.len())
                .map_err(|_| AppError::payload_too_large("File is too large"))?;

            self.storage.write(&path, upload.data).await?;

            let record = CreateFile {
                id: file_id,
                file_group_id: group.id,
                original_filename: upload.filename,
                content_type: upload
                    .content_type
                    .filter(|ct| !ct.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                size_bytes,
            };

            match self.catalog.add_file(record).await {
                Ok(file) => stored.push(file),
                Err(e) => {
                    if let Err(cleanup) = self.storage.delete(&path).await {
                        warn!(path, error = %cleanup, "Failed to remove orphaned upload");
                    }
                    return Err(e);
                }
            }
        }

        info!(
            user_id = %user_id,
            group_id = %group.id,
            files = stored.len(),
            "Files uploaded"
        );
        Ok((group, stored))
    }

    fn validate(&self, uploads: &[UploadedFile]) -> Result<(), AppError> {
        if uploads.is_empty() {
            return Err(AppError::validation("At least one file is required"));
        }
        for upload in uploads {
            if upload.filename.trim().is_empty() {
                return Err(AppError::validation("Every file needs a filename"));
            }
            if upload.data.len() as u64 > self.max_file_size {
                return Err(AppError::payload_too_large(format!(
                    "'{}' exceeds the {} byte limit",
                    upload.filename, self.max_file_size
                )));
            }
        }
        Ok(())
    }
}
