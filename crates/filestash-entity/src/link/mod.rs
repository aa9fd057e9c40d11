//! Temporary (single-use) link entities.

pub mod model;
pub mod row;

pub use model::{LinkId, LinkState, LinkStatus, LinkTarget, LinkTargetKind, TemporaryLink};
pub use row::TemporaryLinkRow;
