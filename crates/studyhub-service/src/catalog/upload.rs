//! File upload service — stores the bytes, then records the FILE resource.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use studyhub_core::config::storage::StorageConfig;
use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::storage::FileStore;
use studyhub_database::repositories::ResourceRepository;
use studyhub_entity::resource::{CreateResource, ResourceType};

use crate::catalog::{CatalogService, ResourceDetail};
use crate::context::RequestContext;

/// Upload parameters collected from the multipart form.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Resource title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Categories to attach. Unknown ids are skipped.
    pub category_ids: Vec<Uuid>,
    /// Raw tag names; normalized and created as needed.
    pub tag_names: Vec<String>,
    /// Original filename from the file part, if the client sent one.
    pub filename: Option<String>,
    /// Declared content type of the file part.
    pub content_type: Option<String>,
    /// File content bytes.
    pub data: Bytes,
}

/// Handles single-request file uploads.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Resource repository.
    resource_repo: Arc<ResourceRepository>,
    /// Catalog service, for tag resolution and response hydration.
    catalog: Arc<CatalogService>,
    /// File store receiving the bytes.
    store: Arc<dyn FileStore>,
    /// Storage configuration.
    config: StorageConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        resource_repo: Arc<ResourceRepository>,
        catalog: Arc<CatalogService>,
        store: Arc<dyn FileStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            resource_repo,
            catalog,
            store,
            config,
        }
    }

    /// Stores an uploaded file and records the FILE resource.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        params: UploadParams,
    ) -> AppResult<ResourceDetail> {
        let filename = match params.filename {
            Some(name) if !name.is_empty() => name,
            _ => return Err(AppError::validation("File has no filename")),
        };

        if params.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let tag_ids = self.catalog.resolve_tag_ids(&params.tag_names).await?;

        let stored = self.store.save(&filename, params.data).await?;

        let record = CreateResource {
            title: params.title,
            description: params.description,
            resource_type: ResourceType::File,
            file_path: Some(stored.path),
            url: None,
            file_size: Some(stored.size_bytes),
            mime_type: params.content_type,
            uploader_id: ctx.user_id,
        };

        let resource = self
            .resource_repo
            .create(&record, &params.category_ids, &tag_ids)
            .await?;

        info!(
            user_id = %ctx.user_id,
            resource_id = %resource.id,
            filename = %filename,
            size = stored.size_bytes,
            "File resource uploaded"
        );

        self.catalog.hydrate(resource).await
    }
}
