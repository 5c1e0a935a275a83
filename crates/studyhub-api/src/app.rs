//! Server bootstrap — wires repositories, services, and the router, then
//! serves until shutdown.

use std::sync::Arc;

use studyhub_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use studyhub_core::config::AppConfig;
use studyhub_core::error::AppError;
use studyhub_core::traits::FileStore;
use studyhub_database::repositories::{
    BookmarkRepository, CategoryRepository, ResourceRepository, TagRepository, UserRepository,
};
use studyhub_database::{DatabasePool, migration};
use studyhub_service::auth::AuthService;
use studyhub_service::bookmark::BookmarkService;
use studyhub_service::catalog::{CatalogService, DownloadService, UploadService};
use studyhub_service::taxonomy::{CategoryService, TagService};
use studyhub_service::user::UserService;
use studyhub_storage::LocalFileStore;

use crate::router::build_router;
use crate::state::AppState;

/// Runs the StudyHub server with the given configuration.
///
/// Connects to PostgreSQL, applies pending migrations, wires the full
/// service graph, and serves HTTP until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting StudyHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: File store ───────────────────────────────────────
    let store: Arc<dyn FileStore> =
        Arc::new(LocalFileStore::new(&config.storage.upload_dir).await?);

    // ── Step 2: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    let db_pool = db.into_pool();

    // ── Step 3: Repositories ─────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let category_repo = Arc::new(CategoryRepository::new(db_pool.clone()));
    let tag_repo = Arc::new(TagRepository::new(db_pool.clone()));
    let resource_repo = Arc::new(ResourceRepository::new(db_pool.clone()));
    let bookmark_repo = Arc::new(BookmarkRepository::new(db_pool.clone()));

    // ── Step 4: Auth components ──────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let password_validator = Arc::new(PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    // ── Step 5: Services ─────────────────────────────────────────
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&resource_repo),
        Arc::clone(&bookmark_repo),
        Arc::clone(&password_hasher),
    ));
    let catalog_service = Arc::new(CatalogService::new(
        Arc::clone(&resource_repo),
        Arc::clone(&category_repo),
        Arc::clone(&tag_repo),
        Arc::clone(&user_repo),
        Arc::clone(&store),
    ));
    let upload_service = Arc::new(UploadService::new(
        Arc::clone(&resource_repo),
        Arc::clone(&catalog_service),
        Arc::clone(&store),
        config.storage.clone(),
    ));
    let download_service = Arc::new(DownloadService::new(
        Arc::clone(&resource_repo),
        Arc::clone(&store),
    ));
    let category_service = Arc::new(CategoryService::new(Arc::clone(&category_repo)));
    let tag_service = Arc::new(TagService::new(Arc::clone(&tag_repo)));
    let bookmark_service = Arc::new(BookmarkService::new(
        Arc::clone(&bookmark_repo),
        Arc::clone(&resource_repo),
        Arc::clone(&catalog_service),
    ));

    // ── Step 6: Build and start HTTP server ──────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        auth_service,
        user_service,
        catalog_service,
        upload_service,
        download_service,
        category_service,
        tag_service,
        bookmark_service,
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("StudyHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("StudyHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
