//! Core catalog service — listing, link registration, partial updates, and
//! deletion, with responses hydrated into full resource details.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::storage::FileStore;
use studyhub_core::types::pagination::{Page, PageRequest};
use studyhub_database::repositories::{
    CategoryRepository, ResourceFilter, ResourceRepository, TagRepository, UserRepository,
};
use studyhub_entity::category::Category;
use studyhub_entity::resource::{CreateResource, Resource, ResourceType, UpdateResource};
use studyhub_entity::tag::{normalize_name, Tag};
use studyhub_entity::user::User;

use crate::context::RequestContext;

/// A resource joined with its uploader, categories, and tags — the shape
/// every catalog read returns.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResourceDetail {
    /// The resource row itself, flattened into the top level.
    #[serde(flatten)]
    pub resource: Resource,
    /// The uploading user (password hash never serialized).
    pub uploader: User,
    /// Categories attached to the resource.
    pub categories: Vec<Category>,
    /// Tags attached to the resource.
    pub tags: Vec<Tag>,
}

/// Data for registering a LINK resource.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewResource {
    /// Resource title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Must be LINK; FILE resources go through the upload flow.
    pub resource_type: ResourceType,
    /// External URL. Required.
    pub url: Option<String>,
    /// Categories to attach. Unknown ids are skipped.
    pub category_ids: Vec<Uuid>,
    /// Raw tag names; normalized and created as needed.
    pub tag_names: Vec<String>,
}

/// Partial update of a resource. `None` scalar fields are left unchanged;
/// a present `category_ids` / `tag_names` (even empty) fully replaces that
/// association set.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ResourcePatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement category set.
    pub category_ids: Option<Vec<Uuid>>,
    /// Replacement tag set, as raw names.
    pub tag_names: Option<Vec<String>>,
}

/// Orchestrates catalog reads and mutations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    /// Resource repository.
    resource_repo: Arc<ResourceRepository>,
    /// Category repository.
    category_repo: Arc<CategoryRepository>,
    /// Tag repository.
    tag_repo: Arc<TagRepository>,
    /// User repository, for hydrating uploaders.
    user_repo: Arc<UserRepository>,
    /// File store, for removing bytes when FILE resources are deleted.
    store: Arc<dyn FileStore>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(
        resource_repo: Arc<ResourceRepository>,
        category_repo: Arc<CategoryRepository>,
        tag_repo: Arc<TagRepository>,
        user_repo: Arc<UserRepository>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            resource_repo,
            category_repo,
            tag_repo,
            user_repo,
            store,
        }
    }

    /// Lists resources matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &ResourceFilter,
        page: &PageRequest,
    ) -> AppResult<Page<ResourceDetail>> {
        let rows = self.resource_repo.list(filter, page).await?;
        self.hydrate_page(rows).await
    }

    /// Registers a LINK resource.
    pub async fn create_link(
        &self,
        ctx: &RequestContext,
        data: NewResource,
    ) -> AppResult<ResourceDetail> {
        if data.resource_type == ResourceType::File {
            return Err(AppError::validation("Use /upload endpoint for file resources"));
        }
        let url = match data.url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(AppError::validation("URL is required for link resources")),
        };

        let tag_ids = self.resolve_tag_ids(&data.tag_names).await?;
        let record = CreateResource {
            title: data.title,
            description: data.description,
            resource_type: ResourceType::Link,
            file_path: None,
            url: Some(url),
            file_size: None,
            mime_type: None,
            uploader_id: ctx.user_id,
        };

        let resource = self
            .resource_repo
            .create(&record, &data.category_ids, &tag_ids)
            .await?;

        info!(
            user_id = %ctx.user_id,
            resource_id = %resource.id,
            title = %resource.title,
            "Link resource registered"
        );

        self.hydrate(resource).await
    }

    /// Fetches one resource with full details.
    pub async fn get(&self, id: Uuid) -> AppResult<ResourceDetail> {
        let resource = self
            .resource_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;
        self.hydrate(resource).await
    }

    /// Applies a partial update. Only the uploader may update a resource.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: ResourcePatch,
    ) -> AppResult<ResourceDetail> {
        let existing = self
            .resource_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;
        if existing.uploader_id != ctx.user_id {
            return Err(AppError::authorization("Not authorized to update this resource"));
        }

        let tag_ids = match &patch.tag_names {
            Some(names) => Some(self.resolve_tag_ids(names).await?),
            None => None,
        };
        let scalars = UpdateResource {
            title: patch.title,
            description: patch.description,
        };

        let resource = self
            .resource_repo
            .update(id, &scalars, patch.category_ids.as_deref(), tag_ids.as_deref())
            .await?;

        info!(user_id = %ctx.user_id, resource_id = %id, "Resource updated");

        self.hydrate(resource).await
    }

    /// Deletes a resource. Only the uploader may delete it.
    ///
    /// For FILE resources the stored bytes are removed first, best-effort:
    /// a storage failure is logged and never blocks record deletion.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let existing = self
            .resource_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;
        if existing.uploader_id != ctx.user_id {
            return Err(AppError::authorization("Not authorized to delete this resource"));
        }

        if existing.is_file() {
            if let Some(path) = existing.file_path.as_deref() {
                if let Err(e) = self.store.delete(path).await {
                    warn!(
                        resource_id = %id,
                        path,
                        error = %e,
                        "Failed to delete stored file; removing record anyway"
                    );
                }
            }
        }

        self.resource_repo.delete(id).await?;

        info!(user_id = %ctx.user_id, resource_id = %id, "Resource deleted");

        Ok(())
    }

    /// Lists the resources attached to a category.
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<ResourceDetail>> {
        self.category_repo
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;

        let rows = self.resource_repo.find_by_category(category_id, page).await?;
        self.hydrate_page(rows).await
    }

    /// Lists the resources carrying a tag.
    pub async fn list_by_tag(
        &self,
        tag_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<ResourceDetail>> {
        self.tag_repo
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found"))?;

        let rows = self.resource_repo.find_by_tag(tag_id, page).await?;
        self.hydrate_page(rows).await
    }

    /// Lists a user's own uploads, newest first.
    pub async fn list_by_uploader(
        &self,
        uploader_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<ResourceDetail>> {
        let rows = self.resource_repo.find_by_uploader(uploader_id, page).await?;
        self.hydrate_page(rows).await
    }

    /// Normalizes raw tag names and resolves them to ids, creating missing
    /// tags as needed. Names that are empty after normalization are skipped.
    pub(crate) async fn resolve_tag_ids(&self, names: &[String]) -> AppResult<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(names.len());
        for raw in names {
            let name = normalize_name(raw);
            if name.is_empty() {
                continue;
            }
            let tag = self.tag_repo.create_or_get(&name).await?;
            ids.push(tag.id);
        }
        Ok(ids)
    }

    /// Hydrates one resource into its detail shape.
    pub(crate) async fn hydrate(&self, resource: Resource) -> AppResult<ResourceDetail> {
        let mut details = self.hydrate_many(vec![resource]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::internal("Hydration dropped the resource"))
    }

    /// Hydrates a batch of resources, preserving input order. Three queries
    /// per batch: category links, tag links, and the distinct uploaders.
    pub(crate) async fn hydrate_many(
        &self,
        resources: Vec<Resource>,
    ) -> AppResult<Vec<ResourceDetail>> {
        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = resources.iter().map(|r| r.id).collect();
        let mut uploader_ids: Vec<Uuid> = resources.iter().map(|r| r.uploader_id).collect();
        uploader_ids.sort_unstable();
        uploader_ids.dedup();

        let category_links = self.resource_repo.categories_for(&ids).await?;
        let tag_links = self.resource_repo.tags_for(&ids).await?;
        let uploaders: HashMap<Uuid, User> = self
            .user_repo
            .find_by_ids(&uploader_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut categories_by_resource: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for link in category_links {
            categories_by_resource
                .entry(link.resource_id)
                .or_default()
                .push(link.category);
        }
        let mut tags_by_resource: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in tag_links {
            tags_by_resource.entry(link.resource_id).or_default().push(link.tag);
        }

        resources
            .into_iter()
            .map(|resource| {
                let uploader = uploaders.get(&resource.uploader_id).cloned().ok_or_else(|| {
                    AppError::database(format!(
                        "Uploader {} missing for resource {}",
                        resource.uploader_id, resource.id
                    ))
                })?;
                Ok(ResourceDetail {
                    uploader,
                    categories: categories_by_resource.remove(&resource.id).unwrap_or_default(),
                    tags: tags_by_resource.remove(&resource.id).unwrap_or_default(),
                    resource,
                })
            })
            .collect()
    }

    /// Hydrates a page of resources, keeping the pagination bookkeeping.
    pub(crate) async fn hydrate_page(
        &self,
        page: Page<Resource>,
    ) -> AppResult<Page<ResourceDetail>> {
        let Page {
            items,
            total,
            limit,
            offset,
            has_more,
        } = page;
        let items = self.hydrate_many(items).await?;
        Ok(Page {
            items,
            total,
            limit,
            offset,
            has_more,
        })
    }
}
