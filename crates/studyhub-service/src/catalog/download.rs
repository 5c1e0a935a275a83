//! File download service — streams stored bytes back to the caller.

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::storage::{ByteStream, FileStore};
use studyhub_database::repositories::ResourceRepository;

/// A prepared download: the byte stream plus the response metadata.
pub struct Download {
    /// Streamed file content.
    pub stream: ByteStream,
    /// Filename for the Content-Disposition header (basename of the
    /// stored path).
    pub filename: String,
    /// Content type, falling back to `application/octet-stream`.
    pub content_type: String,
    /// Stored size in bytes, when known.
    pub size_bytes: Option<i64>,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

/// Resolves a FILE resource to its stored bytes.
#[derive(Debug, Clone)]
pub struct DownloadService {
    /// Resource repository.
    resource_repo: Arc<ResourceRepository>,
    /// File store holding the bytes.
    store: Arc<dyn FileStore>,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(resource_repo: Arc<ResourceRepository>, store: Arc<dyn FileStore>) -> Self {
        Self {
            resource_repo,
            store,
        }
    }

    /// Opens a download for a FILE resource.
    ///
    /// A missing record, a LINK resource, and vanished bytes are all
    /// NotFound — there is nothing to download in each case.
    pub async fn download(&self, id: Uuid) -> AppResult<Download> {
        let resource = self
            .resource_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        let path = match resource.file_path.as_deref() {
            Some(path) if resource.is_file() => path,
            _ => return Err(AppError::not_found("File not found")),
        };

        if !self.store.exists(path).await? {
            return Err(AppError::not_found("File not found"));
        }

        let stream = self.store.open(path).await?;
        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        let content_type = resource
            .mime_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(Download {
            stream,
            filename,
            content_type,
            size_bytes: resource.file_size,
        })
    }
}
