//! Persistence traits shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use filestash_core::result::AppResult;
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_entity::file::{CreateFile, File, FileGroup};
use filestash_entity::link::{LinkId, LinkTargetKind, TemporaryLink};
use filestash_entity::user::User;

/// Backing store for temporary links.
///
/// `claim` is the only operation that mutates status and must be atomic per
/// link id: among any number of concurrent claims of one link, at most one
/// returns `Ok`.
#[async_trait]
pub trait LinkStore: Send + Sync + std::fmt::Debug + 'static {
    /// Backend name for logs and health output.
    fn backend_name(&self) -> &str;

    /// Persist a freshly issued link. Fails with `Conflict` if the id is
    /// already taken.
    async fn insert(&self, link: &TemporaryLink) -> AppResult<()>;

    /// Read a link without changing it.
    async fn find(&self, id: &LinkId) -> AppResult<Option<TemporaryLink>>;

    /// Atomically move the link from `Active` to `Consumed` and return the
    /// consumed link.
    ///
    /// Fails with `NotFound` for an unknown id or a target kind other than
    /// `expected`, `AlreadyConsumed` for a consumed link, and `Expired` for
    /// an active link whose expiry is at or before `now`.
    async fn claim(
        &self,
        id: &LinkId,
        expected: Option<LinkTargetKind>,
        now: DateTime<Utc>,
    ) -> AppResult<TemporaryLink>;

    /// Delete links that are no longer redeemable and older than `cutoff`.
    /// Returns the number removed.
    async fn purge(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// User accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Create and persist a new active user.
    async fn create_user(&self) -> AppResult<User>;

    /// Find an active user.
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;
}

/// File and file group metadata.
///
/// All lookups ignore inactive rows, and an inactive group hides its files.
#[async_trait]
pub trait FileCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Create a new group owned by `user_id`.
    async fn create_group(&self, user_id: UserId) -> AppResult<FileGroup>;

    /// Record a file in an existing group.
    async fn add_file(&self, data: CreateFile) -> AppResult<File>;

    /// Find an active file.
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// Find an active group.
    async fn find_group(&self, id: FileGroupId) -> AppResult<Option<FileGroup>>;

    /// Files of a group, oldest first.
    async fn files_in_group(&self, id: FileGroupId) -> AppResult<Vec<File>>;

    /// Files across all of a user's groups, newest first.
    async fn files_by_user(&self, user_id: UserId) -> AppResult<Vec<File>>;

    /// Groups owned by a user, newest first.
    async fn groups_by_user(&self, user_id: UserId) -> AppResult<Vec<FileGroup>>;
}
