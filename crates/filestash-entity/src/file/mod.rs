//! File and file group entities.

pub mod group;
pub mod model;

pub use group::FileGroup;
pub use model::{CreateFile, DEFAULT_CONTENT_TYPE, File};
