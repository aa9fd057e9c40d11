//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use filestash_core::config::AppConfig;
use filestash_database::DatabasePool;
use filestash_service::{
    ClaimOnceLinkStore, DownloadService, FileService, LinkService, UploadService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool; `None` with the in-memory backend
    pub db_pool: Option<DatabasePool>,
    /// Claim-once link store, shared with the retention sweep
    pub link_store: Arc<ClaimOnceLinkStore>,

    // ── Services ─────────────────────────────────────────────
    /// User service
    pub user_service: Arc<UserService>,
    /// File listing service
    pub file_service: Arc<FileService>,
    /// Upload service
    pub upload_service: Arc<UploadService>,
    /// Owner download service
    pub download_service: Arc<DownloadService>,
    /// Temporary link service
    pub link_service: Arc<LinkService>,
}
