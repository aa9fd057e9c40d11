//! Temporary link retention sweep.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing;

use filestash_core::config::purge_cutoff;
use filestash_core::error::AppError;
use filestash_service::ClaimOnceLinkStore;

/// Deletes links that can no longer be redeemed once they are older than
/// the retention window.
#[derive(Debug, Clone)]
pub struct LinkRetentionJob {
    links: Arc<ClaimOnceLinkStore>,
    retention: Duration,
}

impl LinkRetentionJob {
    /// Create a sweep keeping dead links for `retention`.
    pub fn new(links: Arc<ClaimOnceLinkStore>, retention: Duration) -> Self {
        Self { links, retention }
    }

    /// Run the sweep now.
    pub async fn run(&self) -> Result<Value, AppError> {
        self.run_at(Utc::now()).await
    }

    /// Run the sweep as if the current time were `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<Value, AppError> {
        let cutoff = purge_cutoff(now, self.retention)?;
        tracing::info!(%cutoff, "Running link retention sweep");

        let removed = self.links.purge(cutoff).await?;

        Ok(serde_json::json!({
            "task": "link_retention",
            "cutoff": cutoff,
            "links_purged": removed,
        }))
    }
}
