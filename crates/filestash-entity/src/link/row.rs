//! Relational form of [`TemporaryLink`].

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use filestash_core::error::AppError;
use filestash_core::types::UserId;

use super::model::{LinkId, LinkStatus, LinkTarget, LinkTargetKind, TemporaryLink};

/// A `temporary_links` row as returned by sqlx.
#[derive(Debug, Clone, FromRow)]
pub struct TemporaryLinkRow {
    /// Token.
    pub id: String,
    /// Target discriminant.
    pub target_kind: LinkTargetKind,
    /// File or group id, depending on `target_kind`.
    pub target_id: Uuid,
    /// Persisted status.
    pub status: LinkStatus,
    /// Issuing owner.
    pub issued_by: Option<Uuid>,
    /// Issue time.
    pub created_at: DateTime<Utc>,
    /// Claim time.
    pub consumed_at: Option<DateTime<Utc>>,
    /// Expiry time.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<TemporaryLinkRow> for TemporaryLink {
    type Error = AppError;

    fn try_from(row: TemporaryLinkRow) -> Result<Self, Self::Error> {
        match (row.status, row.consumed_at) {
            (LinkStatus::Consumed, None) | (LinkStatus::Active, Some(_)) => {
                return Err(AppError::database(format!(
                    "temporary link row has status {:?} with consumed_at {:?}",
                    row.status, row.consumed_at
                )));
            }
            _ => {}
        }

        Ok(Self {
            id: LinkId::new(row.id),
            target: LinkTarget::from_parts(row.target_kind, row.target_id),
            status: row.status,
            issued_by: row.issued_by.map(UserId::from_uuid),
            created_at: row.created_at,
            consumed_at: row.consumed_at,
            expires_at: row.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use filestash_core::error::ErrorKind;

    use super::*;

    fn row(status: LinkStatus, consumed_at: Option<DateTime<Utc>>) -> TemporaryLinkRow {
        TemporaryLinkRow {
            id: "feedface".to_string(),
            target_kind: LinkTargetKind::Group,
            target_id: Uuid::new_v4(),
            status,
            issued_by: None,
            created_at: Utc::now(),
            consumed_at,
            expires_at: None,
        }
    }

    #[test]
    fn test_row_converts_to_group_target() {
        let row = row(LinkStatus::Active, None);
        let target_id = row.target_id;
        let link = TemporaryLink::try_from(row).expect("valid row");
        assert!(matches!(link.target, LinkTarget::Group(id) if id.into_uuid() == target_id));
    }

    #[test]
    fn test_inconsistent_status_rejected() {
        let err = TemporaryLink::try_from(row(LinkStatus::Consumed, None)).expect_err("corrupt");
        assert_eq!(err.kind, ErrorKind::Database);

        assert!(TemporaryLink::try_from(row(LinkStatus::Active, Some(Utc::now()))).is_err());
        assert!(TemporaryLink::try_from(row(LinkStatus::Consumed, Some(Utc::now()))).is_ok());
    }
}
