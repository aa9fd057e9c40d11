//! Convenience result type alias for FileStash.

use crate::error::AppError;

/// A specialized `Result` type for FileStash operations.
pub type AppResult<T> = Result<T, AppError>;
