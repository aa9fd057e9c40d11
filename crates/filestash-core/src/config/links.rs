//! Temporary link configuration.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted link lifetime: 100 years.
pub const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

/// Longest accepted retention window: 100 years.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Issuance and housekeeping settings for single-use links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Optional lifetime of an unredeemed link. `None` keeps links valid
    /// until their single redemption.
    #[serde(default)]
    pub ttl_seconds: Option<u64>,
    /// Consumed and expired links older than this are purged by the
    /// retention sweep. `0` disables the sweep.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Six-field cron expression for the retention sweep.
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
}

impl LinksConfig {
    /// Link lifetime as a duration, if configured.
    ///
    /// Out-of-range values are rejected by [`validate`](Self::validate) and
    /// yield `None` here.
    pub fn ttl(&self) -> Option<TimeDelta> {
        self.ttl_seconds
            .filter(|secs| *secs <= MAX_TTL_SECONDS)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(TimeDelta::try_seconds)
    }

    /// Retention window, or `None` when the sweep is disabled.
    pub fn retention(&self) -> Option<TimeDelta> {
        (self.retention_days > 0)
            .then(|| retention_window(self.retention_days).ok())
            .flatten()
    }

    /// Reject lifetimes and retention windows that cannot be applied to a
    /// timestamp.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.ttl_seconds {
            Some(0) => {
                return Err(AppError::configuration(
                    "links.ttl_seconds must be greater than zero when set",
                ));
            }
            Some(secs) if secs > MAX_TTL_SECONDS => {
                return Err(AppError::configuration(format!(
                    "links.ttl_seconds must be at most {MAX_TTL_SECONDS}"
                )));
            }
            _ => {}
        }
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(AppError::configuration(format!(
                "links.retention_days must be at most {MAX_RETENTION_DAYS}"
            )));
        }
        Ok(())
    }
}

/// Window of `days` days, bounded by [`MAX_RETENTION_DAYS`].
pub fn retention_window(days: u32) -> Result<TimeDelta, AppError> {
    if days > MAX_RETENTION_DAYS {
        return Err(AppError::validation(format!(
            "Retention of {days} days exceeds the maximum of {MAX_RETENTION_DAYS}"
        )));
    }
    TimeDelta::try_days(i64::from(days))
        .ok_or_else(|| AppError::validation(format!("Retention of {days} days is out of range")))
}

/// Purge cutoff `window` before `now`.
pub fn purge_cutoff(now: DateTime<Utc>, window: TimeDelta) -> Result<DateTime<Utc>, AppError> {
    now.checked_sub_signed(window)
        .ok_or_else(|| AppError::validation("Purge cutoff is out of range"))
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: None,
            retention_days: default_retention_days(),
            sweep_cron: default_sweep_cron(),
        }
    }
}

fn default_retention_days() -> u32 {
    30
}

fn default_sweep_cron() -> String {
    "0 0 * * * *".to_string()
}
