//! Core type definitions used across the FileStash workspace.

pub mod id;

pub use id::*;
