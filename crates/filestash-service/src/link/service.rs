//! Link issuance for owners and redemption for token holders.

use std::sync::Arc;

use tracing::{error, info};

use filestash_core::error::AppError;
use filestash_core::types::{FileGroupId, FileId, UserId};
use filestash_entity::link::{LinkId, LinkTarget, TemporaryLink};

use super::store::ClaimOnceLinkStore;
use crate::file::{DownloadResult, DownloadService, FileService};

/// Issues links for owned resources and turns tokens into content.
#[derive(Debug, Clone)]
pub struct LinkService {
    links: Arc<ClaimOnceLinkStore>,
    files: Arc<FileService>,
    downloads: Arc<DownloadService>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        links: Arc<ClaimOnceLinkStore>,
        files: Arc<FileService>,
        downloads: Arc<DownloadService>,
    ) -> Self {
        Self {
            links,
            files,
            downloads,
        }
    }

    /// Issues a link to one file. The caller must own it.
    pub async fn issue_for_file(
        &self,
        file_id: FileId,
        caller: UserId,
    ) -> Result<TemporaryLink, AppError> {
        self.files.owned_file(file_id, caller).await?;
        let link = self
            .links
            .issue_link(LinkTarget::File(file_id), Some(caller))
            .await?;
        info!(user_id = %caller, file_id = %file_id, "File link created");
        Ok(link)
    }

    /// Issues a link to a whole group. The caller must own it.
    pub async fn issue_for_group(
        &self,
        group_id: FileGroupId,
        caller: UserId,
    ) -> Result<TemporaryLink, AppError> {
        self.files.owned_group(group_id, caller).await?;
        let link = self
            .links
            .issue_link(LinkTarget::Group(group_id), Some(caller))
            .await?;
        info!(user_id = %caller, group_id = %group_id, "Group link created");
        Ok(link)
    }

    /// Claims a file link and returns the file.
    ///
    /// Storage is only read after the claim succeeds. If the read then
    /// fails, the link stays consumed.
    pub async fn redeem_file(&self, token: &LinkId) -> Result<DownloadResult, AppError> {
        let file_id = self.links.claim_file(token).await?;
        self.downloads.load_file(file_id).await.inspect_err(|e| {
            error!(
                link_id = %token.redacted(),
                file_id = %file_id,
                error = %e,
                "Link consumed but its file could not be loaded"
            );
        })
    }

    /// Claims a group link and returns every file of the group as a zip.
    pub async fn redeem_group(&self, token: &LinkId) -> Result<DownloadResult, AppError> {
        let group_id = self.links.claim_group(token).await?;
        self.downloads
            .load_group_archive(group_id)
            .await
            .inspect_err(|e| {
                error!(
                    link_id = %token.redacted(),
                    group_id = %group_id,
                    error = %e,
                    "Link consumed but its group could not be archived"
                );
            })
    }

    /// Reads a link's target and status for audit.
    pub async fn inspect(&self, token: &LinkId) -> Result<TemporaryLink, AppError> {
        self.links.peek(token).await
    }
}
