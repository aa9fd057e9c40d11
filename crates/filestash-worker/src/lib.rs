//! Scheduled housekeeping for FileStash.
//!
//! Currently a single job: the retention sweep that deletes consumed and
//! expired temporary links once they are older than the retention window.

pub mod jobs;
pub mod scheduler;

pub use jobs::LinkRetentionJob;
pub use scheduler::CronScheduler;
