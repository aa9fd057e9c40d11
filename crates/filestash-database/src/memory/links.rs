//! In-memory link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use filestash_core::error::AppError;
use filestash_core::result::AppResult;
use filestash_entity::link::{LinkId, LinkTargetKind, TemporaryLink};

use crate::store::LinkStore;

/// Link store backed by a sharded concurrent map.
///
/// A claim holds the entry's shard write lock across check and update, so
/// claims of one id are serialized while claims of other ids only contend
/// when they hash to the same shard.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    links: DashMap<LinkId, TemporaryLink>,
}

impl MemoryLinkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links, consumed ones included.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, link: &TemporaryLink) -> AppResult<()> {
        match self.links.entry(link.id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Link id already exists")),
            Entry::Vacant(slot) => {
                slot.insert(link.clone());
                Ok(())
            }
        }
    }

    async fn find(&self, id: &LinkId) -> AppResult<Option<TemporaryLink>> {
        Ok(self.links.get(id).map(|entry| entry.value().clone()))
    }

    async fn claim(
        &self,
        id: &LinkId,
        expected: Option<LinkTargetKind>,
        now: DateTime<Utc>,
    ) -> AppResult<TemporaryLink> {
        let Some(mut entry) = self.links.get_mut(id) else {
            return Err(AppError::not_found("Link not found"));
        };
        entry.consume(expected, now)?;
        Ok(entry.value().clone())
    }

    async fn purge(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0u64;
        self.links.retain(|_, link| {
            let purge = link.is_purgeable(cutoff);
            if purge {
                removed += 1;
            }
            !purge
        });
        Ok(removed)
    }
}
