//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use filestash_core::error::{AppError, ErrorKind};
use filestash_core::result::AppResult;
use filestash_core::types::UserId;
use filestash_entity::user::User;

use crate::store::UserDirectory;

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn create_user(&self) -> AppResult<User> {
        sqlx::query_as::<_, User>("INSERT INTO users (id) VALUES ($1) RETURNING *")
            .bind(UserId::new())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create user", e))
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }
}
