//! Request DTOs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use filestash_core::error::AppError;
use filestash_core::types::UserId;

/// `?user_id=` query carried by every owner-scoped route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerQuery {
    /// Caller's user id.
    pub user_id: Option<String>,
}

impl OwnerQuery {
    /// Parses the caller id; missing or malformed is `Validation`.
    pub fn caller(&self) -> Result<UserId, AppError> {
        let raw = self
            .user_id
            .as_deref()
            .ok_or_else(|| AppError::validation("user_id query parameter is required"))?;
        UserId::from_str(raw.trim()).map_err(|_| AppError::validation("Invalid user_id"))
    }
}
