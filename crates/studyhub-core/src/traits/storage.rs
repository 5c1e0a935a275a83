//! File store trait for the catalog's file storage collaborator.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Outcome of persisting an uploaded file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredFile {
    /// Store-relative path under which the bytes were persisted.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: i64,
}

/// A byte stream type used for reading file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for the file storage collaborator.
///
/// The catalog service receives an implementation at construction time and
/// never touches the filesystem directly. The [`FileStore`] trait is defined
/// here in `studyhub-core` and implemented in `studyhub-storage`.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist uploaded bytes under a generated name derived from the
    /// original filename's extension. Returns the stored path and size.
    async fn save(&self, original_filename: &str, data: Bytes) -> AppResult<StoredFile>;

    /// Open a stored file and return its byte stream.
    async fn open(&self, path: &str) -> AppResult<ByteStream>;

    /// Check whether a stored file exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Delete a stored file. Returns `false` (not an error) when the path
    /// does not exist.
    async fn delete(&self, path: &str) -> AppResult<bool>;
}
