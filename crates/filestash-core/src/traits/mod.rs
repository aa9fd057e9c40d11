//! Core traits defined in `filestash-core` and implemented by other crates.

pub mod storage;

pub use storage::StorageProvider;
