//! File and file group repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use filestash_core::error::{AppError, ErrorKind};
use filestash_core::result::AppResult;
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_entity::file::{CreateFile, File, FileGroup};

use crate::store::FileCatalog;

/// Repository for the `files` and `file_groups` tables.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileCatalog for FileRepository {
    async fn create_group(&self, user_id: UserId) -> AppResult<FileGroup> {
        sqlx::query_as::<_, FileGroup>(
            "INSERT INTO file_groups (id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(FileGroupId::new())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file group", e))
    }

    async fn add_file(&self, data: CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, file_group_id, original_filename, content_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.id)
        .bind(data.file_group_id)
        .bind(&data.original_filename)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "SELECT f.* FROM files f \
             JOIN file_groups g ON g.id = f.file_group_id \
             WHERE f.id = $1 AND f.is_active = TRUE AND g.is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_group(&self, id: FileGroupId) -> AppResult<Option<FileGroup>> {
        sqlx::query_as::<_, FileGroup>(
            "SELECT * FROM file_groups WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file group", e))
    }

    async fn files_in_group(&self, id: FileGroupId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT f.* FROM files f \
             JOIN file_groups g ON g.id = f.file_group_id \
             WHERE f.file_group_id = $1 AND f.is_active = TRUE AND g.is_active = TRUE \
             ORDER BY f.created_at ASC, f.original_filename ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list files in group", e)
        })
    }

    async fn files_by_user(&self, user_id: UserId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT f.* FROM files f \
             JOIN file_groups g ON g.id = f.file_group_id \
             WHERE g.user_id = $1 AND f.is_active = TRUE AND g.is_active = TRUE \
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user files", e))
    }

    async fn groups_by_user(&self, user_id: UserId) -> AppResult<Vec<FileGroup>> {
        sqlx::query_as::<_, FileGroup>(
            "SELECT * FROM file_groups WHERE user_id = $1 AND is_active = TRUE \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user groups", e))
    }
}
