//! # filestash-database
//!
//! Persistence for FileStash. [`store`] defines the traits the services
//! depend on; [`repositories`] implements them over PostgreSQL and
//! [`memory`] implements them over process-local maps.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{FileCatalog, LinkStore, UserDirectory};
