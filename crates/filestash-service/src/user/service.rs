//! User creation and lookup.

use std::sync::Arc;

use tracing::info;

use filestash_core::error::AppError;
use filestash_core::types::UserId;
use filestash_database::store::UserDirectory;
use filestash_entity::user::User;

/// Creates and resolves users.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserDirectory>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Creates a new active user.
    pub async fn create_user(&self) -> Result<User, AppError> {
        let user = self.users.create_user().await?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Gets an active user. Missing and inactive users are both `NotFound`.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AppError> {
        self.users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }
}
