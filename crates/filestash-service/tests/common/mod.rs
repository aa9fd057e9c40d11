//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use filestash_core::result::AppResult;
use filestash_core::traits::storage::StorageProvider;
use filestash_core::types::UserId;
use filestash_database::memory::{MemoryCatalog, MemoryLinkStore};
use filestash_entity::file::{File, FileGroup};
use filestash_service::{
    ClaimOnceLinkStore, DownloadService, FileService, LinkService, UploadService, UploadedFile,
    UserService,
};
use filestash_storage::LocalStorageProvider;

/// Upload limit used by the fixtures.
pub const MAX_FILE_SIZE: u64 = 1024;

/// Local storage that counts reads.
#[derive(Debug)]
pub struct CountingStorage {
    inner: LocalStorageProvider,
    reads: AtomicUsize,
}

impl CountingStorage {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageProvider for CountingStorage {
    fn provider_type(&self) -> &str {
        "counting"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_bytes(path).await
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.inner.write(path, data).await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

/// Services wired over in-memory backends and a temporary directory.
pub struct Harness {
    _dir: tempfile::TempDir,
    pub catalog: Arc<MemoryCatalog>,
    pub link_backend: Arc<MemoryLinkStore>,
    pub storage: Arc<CountingStorage>,
    pub users: UserService,
    pub files: Arc<FileService>,
    pub downloads: Arc<DownloadService>,
    pub uploads: UploadService,
    pub link_store: Arc<ClaimOnceLinkStore>,
    pub links: LinkService,
}

impl Harness {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = LocalStorageProvider::new(dir.path().join("uploads"))
            .await
            .expect("storage");
        let storage = Arc::new(CountingStorage {
            inner: local,
            reads: AtomicUsize::new(0),
        });
        let catalog = Arc::new(MemoryCatalog::new());
        let link_backend = Arc::new(MemoryLinkStore::new());

        let users = UserService::new(catalog.clone());
        let files = Arc::new(FileService::new(catalog.clone(), catalog.clone()));
        let downloads = Arc::new(DownloadService::new(
            files.clone(),
            catalog.clone(),
            storage.clone(),
        ));
        let uploads = UploadService::new(
            files.clone(),
            catalog.clone(),
            storage.clone(),
            MAX_FILE_SIZE,
        );
        let link_store = Arc::new(ClaimOnceLinkStore::new(link_backend.clone(), None));
        let links = LinkService::new(link_store.clone(), files.clone(), downloads.clone());

        Self {
            _dir: dir,
            catalog,
            link_backend,
            storage,
            users,
            files,
            downloads,
            uploads,
            link_store,
            links,
        }
    }

    pub async fn user(&self) -> UserId {
        self.users.create_user().await.expect("create user").id
    }

    pub async fn upload(&self, owner: UserId, files: &[(&str, &str)]) -> (FileGroup, Vec<File>) {
        let uploads = files
            .iter()
            .map(|(name, body)| upload(name, body))
            .collect();
        self.uploads.upload(owner, uploads).await.expect("upload")
    }
}

pub fn upload(name: &str, body: &str) -> UploadedFile {
    UploadedFile {
        filename: name.to_string(),
        content_type: Some("text/plain".to_string()),
        data: Bytes::from(body.to_string()),
    }
}

/// Entry names and contents of a zip archive.
pub fn unzip(data: &Bytes) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data.to_vec())).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).expect("entry");
            let mut body = String::new();
            entry.read_to_string(&mut body).expect("utf-8 entry");
            (entry.name().to_string(), body)
        })
        .collect()
}
