//! Single-use temporary links.

pub mod service;
pub mod store;
pub mod token;

pub use service::LinkService;
pub use store::ClaimOnceLinkStore;
