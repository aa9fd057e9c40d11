//! File and group downloads.

use std::sync::Arc;

use bytes::Bytes;
use futures::future::try_join_all;
use tracing::debug;

use filestash_core::error::AppError;
use filestash_core::traits::storage::StorageProvider;
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_database::store::FileCatalog;
use filestash_entity::file::{File, FileGroup};
use filestash_storage::archive::{ArchiveEntry, ZIP_CONTENT_TYPE, build_zip};

use super::service::FileService;

/// Bytes plus the headers a client needs to save them.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// Suggested filename for Content-Disposition.
    pub filename: String,
    /// MIME type for Content-Type.
    pub content_type: String,
    /// Content bytes.
    pub data: Bytes,
}

/// Loads file contents from storage.
///
/// `download_*` methods check ownership. `load_*` methods do not and are
/// meant for callers that have already authorized access some other way,
/// such as a successful link claim.
#[derive(Debug, Clone)]
pub struct DownloadService {
    files: Arc<FileService>,
    catalog: Arc<dyn FileCatalog>,
    storage: Arc<dyn StorageProvider>,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        files: Arc<FileService>,
        catalog: Arc<dyn FileCatalog>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            files,
            catalog,
            storage,
        }
    }

    /// Downloads a single file owned by `caller`.
    pub async fn download_file(
        &self,
        file_id: FileId,
        caller: UserId,
    ) -> Result<DownloadResult, AppError> {
        let (file, group) = self.files.owned_file(file_id, caller).await?;
        self.read(&file, &group).await
    }

    /// Downloads a group owned by `caller` as `{group_id}.zip`.
    pub async fn download_group(
        &self,
        group_id: FileGroupId,
        caller: UserId,
    ) -> Result<DownloadResult, AppError> {
        let group = self.files.owned_group(group_id, caller).await?;
        self.archive(&group).await
    }

    /// Loads a file without an ownership check.
    pub async fn load_file(&self, file_id: FileId) -> Result<DownloadResult, AppError> {
        let file = self
            .catalog
            .find_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        let group = self.find_group(file.file_group_id).await?;
        self.read(&file, &group).await
    }

    /// Loads a group archive without an ownership check.
    pub async fn load_group_archive(
        &self,
        group_id: FileGroupId,
    ) -> Result<DownloadResult, AppError> {
        let group = self.find_group(group_id).await?;
        self.archive(&group).await
    }

    async fn find_group(&self, group_id: FileGroupId) -> Result<FileGroup, AppError> {
        self.catalog
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File group {group_id} not found")))
    }

    async fn read(&self, file: &File, group: &FileGroup) -> Result<DownloadResult, AppError> {
        let data = self
            .storage
            .read_bytes(&file.storage_path(group.user_id))
            .await?;
        debug!(file_id = %file.id, bytes = data.len(), "Loaded file");
        Ok(DownloadResult {
            filename: file.original_filename.clone(),
            content_type: file.content_type.clone(),
            data,
        })
    }

    async fn archive(&self, group: &FileGroup) -> Result<DownloadResult, AppError> {
        let files = self.catalog.files_in_group(group.id).await?;
        let entries = try_join_all(files.iter().map(|file| async move {
            let data = self
                .storage
                .read_bytes(&file.storage_path(group.user_id))
                .await?;
            Ok::<_, AppError>(ArchiveEntry {
                name: file.original_filename.clone(),
                data,
            })
        }))
        .await?;

        let data = build_zip(entries).await?;
        debug!(group_id = %group.id, files = files.len(), bytes = data.len(), "Built group archive");
        Ok(DownloadResult {
            filename: format!("{}.zip", group.id),
            content_type: ZIP_CONTENT_TYPE.to_string(),
            data,
        })
    }
}
