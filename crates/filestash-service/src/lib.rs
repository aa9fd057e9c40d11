//! # filestash-service
//!
//! Business logic service layer for FileStash. Services receive their
//! backends as `Arc<dyn ...>` at construction time; nothing here knows
//! whether it runs against PostgreSQL or the in-memory backends.

pub mod file;
pub mod link;
pub mod user;

pub use file::{DownloadResult, DownloadService, FileService, UploadService, UploadedFile};
pub use link::{ClaimOnceLinkStore, LinkService};
pub use user::UserService;
