//! Ownership-checked file and group lookups.

use std::sync::Arc;

use filestash_core::error::AppError;
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_database::store::{FileCatalog, UserDirectory};
use filestash_entity::file::{File, FileGroup};
use filestash_entity::user::User;

/// Resolves files and groups on behalf of a caller.
///
/// Every method first requires the caller to be an active user (`NotFound`
/// otherwise), then the resource to exist (`NotFound`), then the caller to
/// own it (`Unauthorized`).
#[derive(Debug, Clone)]
pub struct FileService {
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn FileCatalog>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(users: Arc<dyn UserDirectory>, catalog: Arc<dyn FileCatalog>) -> Self {
        Self { users, catalog }
    }

    /// Returns the active user or `NotFound`.
    pub async fn require_user(&self, user_id: UserId) -> Result<User, AppError> {
        self.users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Returns a file owned by `caller` together with its group.
    pub async fn owned_file(
        &self,
        file_id: FileId,
        caller: UserId,
    ) -> Result<(File, FileGroup), AppError> {
        self.require_user(caller).await?;

        let file = self
            .catalog
            .find_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        let group = self.group(file.file_group_id).await?;

        if !group.is_owned_by(caller) {
            return Err(AppError::unauthorized("You do not own this file"));
        }
        Ok((file, group))
    }

    /// Returns a group owned by `caller`.
    pub async fn owned_group(
        &self,
        group_id: FileGroupId,
        caller: UserId,
    ) -> Result<FileGroup, AppError> {
        self.require_user(caller).await?;

        let group = self.group(group_id).await?;
        if !group.is_owned_by(caller) {
            return Err(AppError::unauthorized("You do not own this file group"));
        }
        Ok(group)
    }

    /// Lists every file across the user's groups.
    pub async fn list_files(&self, user_id: UserId) -> Result<Vec<File>, AppError> {
        self.require_user(user_id).await?;
        self.catalog.files_by_user(user_id).await
    }

    /// Lists the user's groups.
    pub async fn list_groups(&self, user_id: UserId) -> Result<Vec<FileGroup>, AppError> {
        self.require_user(user_id).await?;
        self.catalog.groups_by_user(user_id).await
    }

    /// Lists the files of a group owned by `caller`.
    pub async fn files_in_group(
        &self,
        group_id: FileGroupId,
        caller: UserId,
    ) -> Result<Vec<File>, AppError> {
        self.owned_group(group_id, caller).await?;
        self.catalog.files_in_group(group_id).await
    }

    async fn group(&self, group_id: FileGroupId) -> Result<FileGroup, AppError> {
        self.catalog
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File group {group_id} not found")))
    }
}
