//! PostgreSQL implementations of the persistence traits.

pub mod file;
pub mod temporary_link;
pub mod user;

pub use file::FileRepository;
pub use temporary_link::TemporaryLinkRepository;
pub use user::UserRepository;
