//! Claim-once link store: issue, peek, and atomic claim over a backend.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use filestash_core::error::{AppError, ErrorKind};
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_database::store::LinkStore;
use filestash_entity::link::{LinkId, LinkTarget, LinkTargetKind, TemporaryLink};

use super::token::generate_token;

/// Fresh tokens tried before giving up on an id collision.
const MAX_ISSUE_ATTEMPTS: usize = 3;

/// Issues single-use links and guarantees each is claimed at most once.
///
/// Atomicity comes from the backend's `claim`; this type adds token
/// generation, the optional TTL, and logging.
#[derive(Debug, Clone)]
pub struct ClaimOnceLinkStore {
    backend: Arc<dyn LinkStore>,
    ttl: Option<Duration>,
}

impl ClaimOnceLinkStore {
    /// Creates a store over `backend`. With `ttl` set, unredeemed links
    /// expire that long after issue.
    pub fn new(backend: Arc<dyn LinkStore>, ttl: Option<Duration>) -> Self {
        Self { backend, ttl }
    }

    /// Name of the backing store.
    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }

    /// Stores a new `Active` link for `target` and returns its token.
    ///
    /// Does not check that the target exists or who owns it.
    pub async fn issue(
        &self,
        target: LinkTarget,
        issued_by: Option<UserId>,
    ) -> Result<LinkId, AppError> {
        self.issue_link(target, issued_by).await.map(|link| link.id)
    }

    /// Like [`issue`](Self::issue) but returns the whole stored link.
    pub async fn issue_link(
        &self,
        target: LinkTarget,
        issued_by: Option<UserId>,
    ) -> Result<TemporaryLink, AppError> {
        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let link =
                TemporaryLink::issue(generate_token()?, target, issued_by, Utc::now(), self.ttl)?;

            match self.backend.insert(&link).await {
                Ok(()) => {
                    info!(
                        link_id = %link.id.redacted(),
                        target = %target,
                        expires_at = ?link.expires_at,
                        "Temporary link issued"
                    );
                    return Ok(link);
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    warn!(attempt, "Link token collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal("Could not allocate a unique link token"))
    }

    /// Reads a link without changing it. Consumed links are returned, not
    /// rejected.
    pub async fn peek(&self, id: &LinkId) -> Result<TemporaryLink, AppError> {
        self.backend
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found"))
    }

    /// Consumes the link and returns its target.
    pub async fn claim(&self, id: &LinkId) -> Result<LinkTarget, AppError> {
        self.claim_kind(id, None).await
    }

    /// Consumes a file link. Any other kind of link is `NotFound` and is
    /// left untouched.
    pub async fn claim_file(&self, id: &LinkId) -> Result<FileId, AppError> {
        match self.claim_kind(id, Some(LinkTargetKind::File)).await? {
            LinkTarget::File(file_id) => Ok(file_id),
            LinkTarget::Group(_) => Err(AppError::internal("Backend returned a group link")),
        }
    }

    /// Consumes a group link. Any other kind of link is `NotFound` and is
    /// left untouched.
    pub async fn claim_group(&self, id: &LinkId) -> Result<FileGroupId, AppError> {
        match self.claim_kind(id, Some(LinkTargetKind::Group)).await? {
            LinkTarget::Group(group_id) => Ok(group_id),
            LinkTarget::File(_) => Err(AppError::internal("Backend returned a file link")),
        }
    }

    /// Deletes consumed and expired links older than `older_than`.
    pub async fn purge(&self, older_than: DateTime<Utc>) -> Result<u64, AppError> {
        let removed = self.backend.purge(older_than).await?;
        info!(removed, cutoff = %older_than, backend = self.backend_name(), "Purged temporary links");
        Ok(removed)
    }

    async fn claim_kind(
        &self,
        id: &LinkId,
        expected: Option<LinkTargetKind>,
    ) -> Result<LinkTarget, AppError> {
        match self.backend.claim(id, expected, Utc::now()).await {
            Ok(link) => {
                info!(link_id = %id.redacted(), target = %link.target, "Temporary link claimed");
                Ok(link.target)
            }
            Err(e) => {
                debug!(link_id = %id.redacted(), reason = %e.kind, "Temporary link claim rejected");
                Err(e)
            }
        }
    }
}
