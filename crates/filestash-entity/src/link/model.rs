//! Temporary link model and its claim-once state machine.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filestash_core::error::AppError;
use filestash_core::result::AppResult;
use filestash_core::types::{FileGroupId, FileId, UserId};

/// Number of leading token characters that may appear in logs.
const LOG_PREFIX_LEN: usize = 8;

/// Opaque bearer token identifying a temporary link.
///
/// The token is the credential, so [`fmt::Display`] prints it in full for
/// URL building while [`LinkId::redacted`] is what goes into logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    /// Wrap an existing token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix safe to log.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(LOG_PREFIX_LEN).collect();
        format!("{prefix}…")
    }
}

impl fmt::Debug for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LinkId").field(&self.redacted()).finish()
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LinkId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Discriminant of a [`LinkTarget`], stored as the `link_target_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "link_target_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkTargetKind {
    /// A single file.
    File,
    /// A whole file group.
    Group,
}

impl fmt::Display for LinkTargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// The resource a link grants access to. Exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LinkTarget {
    /// A single file.
    File(FileId),
    /// Every file of a group, delivered as one archive.
    Group(FileGroupId),
}

impl LinkTarget {
    /// The discriminant.
    pub fn kind(&self) -> LinkTargetKind {
        match self {
            Self::File(_) => LinkTargetKind::File,
            Self::Group(_) => LinkTargetKind::Group,
        }
    }

    /// The referenced id as a plain UUID, for the `target_id` column.
    pub fn resource_id(&self) -> Uuid {
        match self {
            Self::File(id) => id.into_uuid(),
            Self::Group(id) => id.into_uuid(),
        }
    }

    /// Rebuild a target from its persisted pair.
    pub fn from_parts(kind: LinkTargetKind, id: Uuid) -> Self {
        match kind {
            LinkTargetKind::File => Self::File(FileId::from_uuid(id)),
            LinkTargetKind::Group => Self::Group(FileGroupId::from_uuid(id)),
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.resource_id())
    }
}

/// Persisted status. `Active -> Consumed` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "link_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Not yet redeemed.
    Active,
    /// Redeemed exactly once.
    Consumed,
}

/// Observed state at a point in time. `Expired` is derived from
/// `expires_at` and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// Redeemable.
    Active,
    /// Already redeemed.
    Consumed,
    /// Never redeemed and past its TTL.
    Expired,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Consumed => write!(f, "consumed"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A single-use link bound to a file or a file group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporaryLink {
    /// Bearer token.
    pub id: LinkId,
    /// Immutable target.
    pub target: LinkTarget,
    /// Persisted status.
    pub status: LinkStatus,
    /// Owner who issued the link.
    pub issued_by: Option<UserId>,
    /// When the link was issued.
    pub created_at: DateTime<Utc>,
    /// Set once, by the successful claim.
    pub consumed_at: Option<DateTime<Utc>>,
    /// End of validity, when a TTL is configured.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TemporaryLink {
    /// Build a fresh `Active` link.
    ///
    /// Fails if `now + ttl` falls outside the representable time range.
    pub fn issue(
        id: LinkId,
        target: LinkTarget,
        issued_by: Option<UserId>,
        now: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> AppResult<Self> {
        let expires_at = ttl
            .map(|ttl| {
                now.checked_add_signed(ttl)
                    .ok_or_else(|| AppError::validation("Link lifetime is out of range"))
            })
            .transpose()?;
        Ok(Self {
            id,
            target,
            status: LinkStatus::Active,
            issued_by,
            created_at: now,
            consumed_at: None,
            expires_at,
        })
    }

    /// State as observed at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> LinkState {
        match self.status {
            LinkStatus::Consumed => LinkState::Consumed,
            LinkStatus::Active if self.expires_at.is_some_and(|at| at <= now) => {
                LinkState::Expired
            }
            LinkStatus::Active => LinkState::Active,
        }
    }

    /// Check that a claim at `now` would succeed, optionally requiring a
    /// particular target kind.
    ///
    /// A kind mismatch is reported as `NotFound` so that a group token
    /// presented on the file route reveals nothing and stays redeemable.
    pub fn ensure_claimable(
        &self,
        expected: Option<LinkTargetKind>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(kind) = expected {
            if self.target.kind() != kind {
                return Err(AppError::not_found(format!("No {kind} link for this token")));
            }
        }
        match self.state_at(now) {
            LinkState::Active => Ok(()),
            LinkState::Consumed => Err(AppError::already_consumed(
                "This link has already been used",
            )),
            LinkState::Expired => Err(AppError::expired("This link has expired")),
        }
    }

    /// Apply the `Active -> Consumed` transition and return the target.
    ///
    /// Callers must hold exclusive access to this link for the duration of
    /// the call.
    pub fn consume(
        &mut self,
        expected: Option<LinkTargetKind>,
        now: DateTime<Utc>,
    ) -> AppResult<LinkTarget> {
        self.ensure_claimable(expected, now)?;
        self.status = LinkStatus::Consumed;
        self.consumed_at = Some(now);
        Ok(self.target)
    }

    /// Whether the retention sweep may delete this link.
    ///
    /// Consumed links qualify once consumed before `cutoff`; unredeemed
    /// links only once their expiry is before `cutoff`.
    pub fn is_purgeable(&self, cutoff: DateTime<Utc>) -> bool {
        match self.status {
            LinkStatus::Consumed => self.consumed_at.is_some_and(|at| at < cutoff),
            LinkStatus::Active => self.expires_at.is_some_and(|at| at < cutoff),
        }
    }
}
