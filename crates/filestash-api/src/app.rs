//! Application builder: wires backends, services, router, and the retention
//! sweep into a running server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use filestash_core::config::{AppConfig, DatabaseBackend};
use filestash_core::error::AppError;
use filestash_core::traits::storage::StorageProvider;
use filestash_database::memory::{MemoryCatalog, MemoryLinkStore};
use filestash_database::repositories::{FileRepository, TemporaryLinkRepository, UserRepository};
use filestash_database::{DatabasePool, FileCatalog, LinkStore, UserDirectory};
use filestash_service::{
    ClaimOnceLinkStore, DownloadService, FileService, LinkService, UploadService, UserService,
};
use filestash_storage::LocalStorageProvider;
use filestash_worker::CronScheduler;

use crate::router::build_router;
use crate::state::AppState;

/// Persistence handles selected by `database.backend`.
#[derive(Debug, Clone)]
pub struct Backends {
    /// User lookup and creation.
    pub users: Arc<dyn UserDirectory>,
    /// File and group metadata.
    pub catalog: Arc<dyn FileCatalog>,
    /// Temporary link persistence.
    pub links: Arc<dyn LinkStore>,
    /// Connection pool when backed by PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl Backends {
    /// Connect to the configured backend, running migrations when enabled.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        match config.database.backend {
            DatabaseBackend::Memory => {
                tracing::warn!("Using the in-memory backend; data is lost on restart");
                Ok(Self::in_memory())
            }
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    filestash_database::migration::run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
        }
    }

    /// Process-local backends.
    pub fn in_memory() -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        Self {
            users: catalog.clone(),
            catalog,
            links: Arc::new(MemoryLinkStore::new()),
            pool: None,
        }
    }

    /// PostgreSQL repositories over `pool`.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            catalog: Arc::new(FileRepository::new(pg.clone())),
            links: Arc::new(TemporaryLinkRepository::new(pg)),
            pool: Some(pool),
        }
    }
}

/// Build every service over `backends` and `storage`.
pub fn build_state(
    config: AppConfig,
    backends: Backends,
    storage: Arc<dyn StorageProvider>,
) -> AppState {
    let Backends {
        users,
        catalog,
        links,
        pool,
    } = backends;

    let link_store = Arc::new(ClaimOnceLinkStore::new(links, config.links.ttl()));
    let user_service = Arc::new(UserService::new(Arc::clone(&users)));
    let file_service = Arc::new(FileService::new(users, Arc::clone(&catalog)));
    let upload_service = Arc::new(UploadService::new(
        Arc::clone(&file_service),
        Arc::clone(&catalog),
        Arc::clone(&storage),
        config.server.max_upload_size_bytes,
    ));
    let download_service = Arc::new(DownloadService::new(
        Arc::clone(&file_service),
        catalog,
        storage,
    ));
    let link_service = Arc::new(LinkService::new(
        Arc::clone(&link_store),
        Arc::clone(&file_service),
        Arc::clone(&download_service),
    ));

    AppState {
        config: Arc::new(config),
        db_pool: pool,
        link_store,
        user_service,
        file_service,
        upload_service,
        download_service,
        link_service,
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the FileStash server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileStash server...");
    config.validate()?;

    // ── Step 1: Initialize persistence ───────────────────────────
    tracing::info!(backend = ?config.database.backend, "Initializing persistence...");
    let backends = Backends::from_config(&config).await?;
    let pool = backends.pool.clone();

    // ── Step 2: Initialize storage provider ──────────────────────
    let uploads_root = config.storage.uploads_root();
    let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorageProvider::new(uploads_root).await?);
    if !storage.health_check().await? {
        return Err(AppError::storage("Upload directory is not available"));
    }

    // ── Step 3: Initialize services ──────────────────────────────
    let state = build_state(config.clone(), backends, storage);

    // ── Step 4: Start retention sweep ────────────────────────────
    let scheduler =
        CronScheduler::start_for_links(&config.links, Arc::clone(&state.link_store)).await?;

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("FileStash server listening on {}", addr);

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::select! {
        result = served => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        () = drain_deadline(grace) => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Shutdown grace period elapsed, dropping open connections");
        }
    }

    // ── Step 6: Stop background work ─────────────────────────────
    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    if let Some(pool) = pool {
        pool.close().await;
    }

    tracing::info!("FileStash server stopped");
    Ok(())
}

/// Completes `grace` after the shutdown signal, bounding the connection drain.
async fn drain_deadline(grace: Duration) {
    shutdown_signal().await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
