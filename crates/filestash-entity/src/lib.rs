//! # filestash-entity
//!
//! Domain entity models for FileStash. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`; the temporary link is decoded through
//! an intermediate row type so that its target is always a well-formed
//! tagged union.

pub mod file;
pub mod link;
pub mod user;
