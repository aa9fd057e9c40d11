//! File services: ownership-checked lookups, downloads, and uploads.

pub mod download;
pub mod service;
pub mod upload;

pub use download::{DownloadResult, DownloadService};
pub use service::FileService;
pub use upload::{UploadService, UploadedFile};
