//! In-memory users, groups, and files.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use filestash_core::error::AppError;
use filestash_core::result::AppResult;
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_entity::file::{CreateFile, File, FileGroup};
use filestash_entity::user::User;

use crate::store::{FileCatalog, UserDirectory};

/// Process-local implementation of [`UserDirectory`] and [`FileCatalog`].
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    users: DashMap<UserId, User>,
    groups: DashMap<FileGroupId, FileGroup>,
    files: DashMap<FileId, File>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Soft-disable or re-enable a user.
    pub fn set_user_active(&self, id: UserId, active: bool) -> AppResult<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.is_active = active;
        user.updated_at = Utc::now();
        Ok(())
    }

    /// Soft-disable or re-enable a group.
    pub fn set_group_active(&self, id: FileGroupId, active: bool) -> AppResult<()> {
        let mut group = self
            .groups
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File group {id} not found")))?;
        group.is_active = active;
        group.updated_at = Utc::now();
        Ok(())
    }

    fn group_is_active(&self, id: FileGroupId) -> bool {
        self.groups.get(&id).is_some_and(|g| g.is_active)
    }

    fn visible_files(&self, keep: impl Fn(&File) -> bool) -> Vec<File> {
        self.files
            .iter()
            .filter(|f| f.is_active && self.group_is_active(f.file_group_id) && keep(f))
            .map(|f| f.value().clone())
            .collect()
    }
}

#[async_trait]
impl UserDirectory for MemoryCatalog {
    async fn create_user(&self) -> AppResult<User> {
        let user = User::new(Utc::now());
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .get(&id)
            .filter(|u| u.is_active)
            .map(|u| u.value().clone()))
    }
}

#[async_trait]
impl FileCatalog for MemoryCatalog {
    async fn create_group(&self, user_id: UserId) -> AppResult<FileGroup> {
        let group = FileGroup::new(user_id, Utc::now());
        self.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn add_file(&self, data: CreateFile) -> AppResult<File> {
        if !self.groups.contains_key(&data.file_group_id) {
            return Err(AppError::not_found(format!(
                "File group {} not found",
                data.file_group_id
            )));
        }
        let file = data.into_file(Utc::now());
        self.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        let Some(file) = self.files.get(&id).map(|f| f.value().clone()) else {
            return Ok(None);
        };
        Ok((file.is_active && self.group_is_active(file.file_group_id)).then_some(file))
    }

    async fn find_group(&self, id: FileGroupId) -> AppResult<Option<FileGroup>> {
        Ok(self
            .groups
            .get(&id)
            .filter(|g| g.is_active)
            .map(|g| g.value().clone()))
    }

    async fn files_in_group(&self, id: FileGroupId) -> AppResult<Vec<File>> {
        let mut files = self.visible_files(|f| f.file_group_id == id);
        files.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.original_filename.cmp(&b.original_filename))
        });
        Ok(files)
    }

    async fn files_by_user(&self, user_id: UserId) -> AppResult<Vec<File>> {
        let owned: Vec<FileGroupId> = self
            .groups
            .iter()
            .filter(|g| g.user_id == user_id)
            .map(|g| g.id)
            .collect();
        let mut files = self.visible_files(|f| owned.contains(&f.file_group_id));
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn groups_by_user(&self, user_id: UserId) -> AppResult<Vec<FileGroup>> {
        let mut groups: Vec<FileGroup> = self
            .groups
            .iter()
            .filter(|g| g.user_id == user_id && g.is_active)
            .map(|g| g.value().clone())
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }
}
