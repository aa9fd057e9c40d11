//! File group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filestash_core::types::{FileGroupId, UserId};

/// The set of files created by one upload call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileGroup {
    /// Unique group identifier.
    pub id: FileGroupId,
    /// The owning user.
    pub user_id: UserId,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When the group was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-disable flag.
    pub is_active: bool,
}

impl FileGroup {
    /// Build a fresh, active group owned by `user_id`.
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: FileGroupId::new(),
            user_id,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    /// Whether `user_id` owns this group.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
