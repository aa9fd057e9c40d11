//! Cron scheduler for periodic housekeeping.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use filestash_core::config::LinksConfig;
use filestash_core::error::AppError;
use filestash_service::ClaimOnceLinkStore;

use crate::jobs::LinkRetentionJob;

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create an empty scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Build and start a scheduler running the link retention sweep, or
    /// return `None` when `links.retention_days` is 0.
    pub async fn start_for_links(
        config: &LinksConfig,
        links: Arc<ClaimOnceLinkStore>,
    ) -> Result<Option<Self>, AppError> {
        let Some(retention) = config.retention() else {
            tracing::info!("Link retention sweep disabled");
            return Ok(None);
        };

        let scheduler = Self::new().await?;
        scheduler
            .register_link_retention(&config.sweep_cron, LinkRetentionJob::new(links, retention))
            .await?;
        scheduler.start().await?;
        Ok(Some(scheduler))
    }

    /// Register the retention sweep on `cron` (six fields, seconds first).
    pub async fn register_link_retention(
        &self,
        cron: &str,
        job: LinkRetentionJob,
    ) -> Result<(), AppError> {
        let job = Arc::new(job);
        let cron_job = CronJob::new_async(cron, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                match job.run().await {
                    Ok(summary) => tracing::info!(%summary, "Link retention sweep finished"),
                    Err(e) => tracing::error!(error = %e, "Link retention sweep failed"),
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid links.sweep_cron '{cron}': {e}"))
        })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add link_retention schedule: {e}"))
        })?;

        tracing::info!(cron, "Registered: link_retention");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
