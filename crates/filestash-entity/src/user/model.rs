//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filestash_core::types::UserId;

/// An account that owns file groups.
///
/// Users carry no credentials; ownership of a group is the only access
/// rule in the system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-disable flag. Inactive users behave as missing.
    pub is_active: bool,
}

impl User {
    /// Build a fresh, active user.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }
}
