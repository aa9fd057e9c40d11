//! # filestash-storage
//!
//! Blob storage for uploaded files and the zip packaging used for group
//! downloads.

pub mod archive;
pub mod providers;

pub use archive::{ArchiveEntry, build_zip};
pub use providers::LocalStorageProvider;
