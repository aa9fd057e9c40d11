//! Temporary link repository implementation.
//!
//! The claim is one conditional `UPDATE ... RETURNING`: PostgreSQL's row
//! lock makes concurrent claims of the same id serialize, and only the
//! first sees `status = 'active'`. Losers issue a read purely to report why.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use filestash_core::error::{AppError, ErrorKind};
use filestash_core::result::AppResult;
use filestash_entity::link::{
    LinkId, LinkStatus, LinkTargetKind, TemporaryLink, TemporaryLinkRow,
};

use crate::store::LinkStore;

const CLAIM_SQL: &str = "\
    UPDATE temporary_links \
    SET status = 'consumed', consumed_at = $2 \
    WHERE id = $1 \
      AND status = 'active' \
      AND ($3::link_target_kind IS NULL OR target_kind = $3) \
      AND (expires_at IS NULL OR expires_at > $2) \
    RETURNING *";

const PURGE_SQL: &str = "\
    DELETE FROM temporary_links \
    WHERE (status = 'consumed' AND consumed_at < $1) \
       OR (status = 'active' AND expires_at IS NOT NULL AND expires_at < $1)";

/// Repository for the `temporary_links` table.
#[derive(Debug, Clone)]
pub struct TemporaryLinkRepository {
    pool: PgPool,
}

impl TemporaryLinkRepository {
    /// Create a new temporary link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explain a claim whose `UPDATE` matched no row.
    async fn classify_failed_claim(
        &self,
        id: &LinkId,
        expected: Option<LinkTargetKind>,
        now: DateTime<Utc>,
    ) -> AppError {
        let link = match self.find(id).await {
            Ok(Some(link)) => link,
            Ok(None) => return AppError::not_found("Link not found"),
            Err(e) => return e,
        };

        match link.ensure_claimable(expected, now) {
            Err(reason) => reason,
            Ok(()) => {
                warn!(
                    link_id = %id.redacted(),
                    "Claim matched no row but the link reads as claimable"
                );
                AppError::internal("Link claim did not apply")
            }
        }
    }
}

#[async_trait]
impl LinkStore for TemporaryLinkRepository {
    fn backend_name(&self) -> &str {
        "postgres"
    }

    async fn insert(&self, link: &TemporaryLink) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO temporary_links \
             (id, target_kind, target_id, status, issued_by, created_at, consumed_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(link.id.as_str())
        .bind(link.target.kind())
        .bind(link.target.resource_id())
        .bind(link.status)
        .bind(link.issued_by)
        .bind(link.created_at)
        .bind(link.consumed_at)
        .bind(link.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                AppError::with_source(ErrorKind::Conflict, "Link id already exists", e)
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert temporary link", e)
            }
        })?;
        Ok(())
    }

    async fn find(&self, id: &LinkId) -> AppResult<Option<TemporaryLink>> {
        let row = sqlx::query_as::<_, TemporaryLinkRow>(
            "SELECT * FROM temporary_links WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find temporary link", e))?;

        row.map(TemporaryLink::try_from).transpose()
    }

    async fn claim(
        &self,
        id: &LinkId,
        expected: Option<LinkTargetKind>,
        now: DateTime<Utc>,
    ) -> AppResult<TemporaryLink> {
        let row = sqlx::query_as::<_, TemporaryLinkRow>(CLAIM_SQL)
            .bind(id.as_str())
            .bind(now)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to claim temporary link", e)
            })?;

        match row {
            Some(row) => {
                let link = TemporaryLink::try_from(row)?;
                debug_assert_eq!(link.status, LinkStatus::Consumed);
                Ok(link)
            }
            None => Err(self.classify_failed_claim(id, expected, now).await),
        }
    }

    async fn purge(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(PURGE_SQL)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge temporary links", e)
            })?;
        Ok(result.rows_affected())
    }
}
