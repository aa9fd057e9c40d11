//! HTTP integration tests against the in-memory backends.

mod file_test;
mod helpers;
mod link_test;
mod log_test;
mod user_test;
