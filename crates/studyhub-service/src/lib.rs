//! # studyhub-service
//!
//! Business logic service layer for StudyHub. Each service orchestrates
//! repositories, the file store, and authentication to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod bookmark;
pub mod catalog;
pub mod context;
pub mod taxonomy;
pub mod user;

pub use auth::AuthService;
pub use bookmark::BookmarkService;
pub use catalog::{CatalogService, DownloadService, UploadService};
pub use context::RequestContext;
pub use taxonomy::{CategoryService, TagService};
pub use user::UserService;
