//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use studyhub_core::config::AppConfig;
use studyhub_service::auth::AuthService;
use studyhub_service::bookmark::BookmarkService;
use studyhub_service::catalog::{CatalogService, DownloadService, UploadService};
use studyhub_service::taxonomy::{CategoryService, TagService};
use studyhub_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool (used directly by the health check)
    pub db_pool: PgPool,

    // ── Services ─────────────────────────────────────────────
    /// Registration, login, and token resolution
    pub auth_service: Arc<AuthService>,
    /// Profile, password, stats, and activity
    pub user_service: Arc<UserService>,
    /// Catalog reads and mutations
    pub catalog_service: Arc<CatalogService>,
    /// Multipart file upload
    pub upload_service: Arc<UploadService>,
    /// File download streaming
    pub download_service: Arc<DownloadService>,
    /// Category hierarchy
    pub category_service: Arc<CategoryService>,
    /// Tag vocabulary
    pub tag_service: Arc<TagService>,
    /// Per-user bookmarks
    pub bookmark_service: Arc<BookmarkService>,
}
