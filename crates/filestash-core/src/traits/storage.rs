//! Storage provider trait for the blob store behind uploaded files.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for file storage backends.
///
/// Paths are relative, `/`-separated keys such as
/// `{user_id}/{group_id}/{file_id}`. The trait is defined here in
/// `filestash-core` and implemented in `filestash-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a stored object into memory. A missing object is `NotFound`.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes at the given path, creating parent directories.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete the object at the given path. Deleting a missing object is
    /// not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether an object exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
