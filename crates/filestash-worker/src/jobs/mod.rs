//! Job implementations.

pub mod link_retention;

pub use link_retention::LinkRetentionJob;
