//! Local filesystem file store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::traits::storage::{ByteStream, FileStore, StoredFile};

/// Local filesystem file store.
///
/// Stored paths are always relative to the root; the generated names are
/// UUIDs, so concurrent saves never collide and caller-supplied filenames
/// never reach the filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalFileStore {
    /// Create a new file store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a store-relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Generate a stored name: a fresh UUID plus the lowercased extension
    /// of the original filename (if it has one).
    fn generate_name(original_filename: &str) -> String {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        format!("{}{}", Uuid::new_v4().simple(), ext)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, original_filename: &str, data: Bytes) -> AppResult<StoredFile> {
        let name = Self::generate_name(original_filename);
        let full_path = self.resolve(&name);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {name}"),
                e,
            )
        })?;

        debug!(path = %name, bytes = data.len(), "Stored uploaded file");
        Ok(StoredFile {
            path: name,
            size_bytes: data.len() as i64,
        })
    }

    async fn open(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open file: {path}"),
                    e,
                )
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path);
        Ok(full_path.exists())
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path = %path, "Deleted stored file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }
}
