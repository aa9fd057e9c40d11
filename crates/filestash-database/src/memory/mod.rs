//! In-process backends built on `DashMap`.
//!
//! Used when `database.backend = "memory"` and by tests. Nothing here
//! survives a restart or is shared between processes.

pub mod catalog;
pub mod links;

pub use catalog::MemoryCatalog;
pub use links::MemoryLinkStore;
